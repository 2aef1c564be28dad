use crate::importer::find_number;
use crate::models::{CategoryKey, ExtractedFields, Itemization, LineItem, Row};
use crate::scraper::scrape_metadata;

pub const LABEL_MAX_CHARS: usize = 120;

/// Keyword rules, matched as lowercase substrings of the joined row text.
pub const CATEGORY_RULES: &[(CategoryKey, &[&str])] = &[
    (
        CategoryKey::GrossRents,
        &[
            "gross potential",
            "market rent",
            "base rent",
            "rental income",
            "lease income",
            "gpr",
            "gross rent",
            "total income",
        ],
    ),
    (
        CategoryKey::OtherIncome,
        &[
            "laundry",
            "parking",
            "rubbish income",
            "utility income",
            "pet",
            "late fee",
            "app fee",
            "misc income",
            "other income",
        ],
    ),
    (
        CategoryKey::Taxes,
        &["real estate tax", "property tax", "school tax", "county tax", "ad valorem"],
    ),
    (
        CategoryKey::Insurance,
        &["hazard insurance", "liability", "property insurance", "umbrella", "flood"],
    ),
    (
        CategoryKey::Repairs,
        &[
            "maintenance",
            "repair",
            "turnover",
            "make ready",
            "contract services",
            "pest",
            "landscaping",
            "snow",
            "cleaning",
        ],
    ),
    (
        CategoryKey::Management,
        &["management fee", "prop mgmt", "leasing fee", "manager salary", "payroll"],
    ),
    (
        CategoryKey::Utilities,
        &["electric", "water", "sewer", "gas", "trash", "rubbish expense", "cable", "internet"],
    ),
    (
        CategoryKey::Admin,
        &[
            "admin",
            "legal",
            "professional",
            "accounting",
            "marketing",
            "advertising",
            "office exp",
            "licenses",
            "permits",
        ],
    ),
];

fn matches(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Adds and rounds to cents so repeated accumulation does not drift.
fn add_cents(total: f64, amount: f64) -> f64 {
    ((total + amount) * 100.0).round() / 100.0
}

/// Largest non-zero figure in the row, or 0 when the row has none.
fn row_amount(row: &Row) -> f64 {
    row.iter()
        .map(|cell| find_number(cell))
        .filter(|n| !n.is_nan() && *n != 0.0)
        .fold(None, |max: Option<f64>, n| Some(max.map_or(n, |m| m.max(n))))
        .unwrap_or(0.0)
}

fn truncate_label(joined: &str) -> String {
    joined.trim().chars().take(LABEL_MAX_CHARS).collect()
}

pub struct CategorizeResult {
    pub fields: ExtractedFields,
    pub itemization: Itemization,
}

/// Classifies every row against [`CATEGORY_RULES`]. A row may land in more
/// than one category; its amount is then counted once per category.
pub fn categorize_rows(rows: &[Row]) -> CategorizeResult {
    let mut fields = ExtractedFields::default();
    let mut itemization = Itemization::default();

    for row in rows {
        let amount = row_amount(row);
        if amount <= 0.0 {
            continue;
        }
        let joined = row.join(" ");
        let lower = joined.to_lowercase();

        for (category, keywords) in CATEGORY_RULES {
            if !matches(&lower, keywords) {
                continue;
            }
            let total = fields.totals.entry(*category).or_insert(0.0);
            *total = add_cents(*total, amount);

            let item = LineItem {
                label: truncate_label(&joined),
                amount,
                category: *category,
            };
            if category.is_income() {
                itemization.income_items.push(item);
            } else {
                itemization.expense_items.push(item);
            }
        }
    }

    tracing::debug!(
        rows = rows.len(),
        income_items = itemization.income_items.len(),
        expense_items = itemization.expense_items.len(),
        "categorized rows"
    );

    CategorizeResult { fields, itemization }
}

/// Metadata scrape plus categorization over one document's rows.
pub fn extract_fields(rows: &[Row]) -> CategorizeResult {
    let meta = scrape_metadata(rows);
    let mut result = categorize_rows(rows);
    result.fields.address = meta.address;
    result.fields.units = meta.units;
    result
}
