use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One normalized document row: cell text in column order, `""` for blanks.
pub type Row = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryKey {
    GrossRents,
    OtherIncome,
    Taxes,
    Insurance,
    Repairs,
    Management,
    Utilities,
    Admin,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 8] = [
        Self::GrossRents,
        Self::OtherIncome,
        Self::Taxes,
        Self::Insurance,
        Self::Repairs,
        Self::Management,
        Self::Utilities,
        Self::Admin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::GrossRents => "Gross Rents",
            Self::OtherIncome => "Other Income",
            Self::Taxes => "Real Estate Taxes",
            Self::Insurance => "Insurance",
            Self::Repairs => "Repairs & Maintenance",
            Self::Management => "Management",
            Self::Utilities => "Utilities",
            Self::Admin => "Admin & Professional",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::GrossRents | Self::OtherIncome)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount: f64,
    pub category: CategoryKey,
}

/// Line items split by side of the operating statement, in row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itemization {
    pub income_items: Vec<LineItem>,
    pub expense_items: Vec<LineItem>,
}

impl Itemization {
    pub fn is_empty(&self) -> bool {
        self.income_items.is_empty() && self.expense_items.is_empty()
    }

    pub fn income_total(&self) -> f64 {
        self.income_items.iter().map(|i| i.amount).sum()
    }

    pub fn expense_total(&self) -> f64 {
        self.expense_items.iter().map(|i| i.amount).sum()
    }
}

/// Everything scraped from a single document before it is merged into a deal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<f64>,
    #[serde(flatten)]
    pub totals: BTreeMap<CategoryKey, f64>,
}

impl ExtractedFields {
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.units.is_none() && self.totals.is_empty()
    }

    pub fn total(&self, key: CategoryKey) -> Option<f64> {
        self.totals.get(&key).copied()
    }

    /// Number of populated fields, the "data points" shown after an upload.
    pub fn len(&self) -> usize {
        self.totals.len() + usize::from(self.address.is_some()) + usize::from(self.units.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DealInputs {
    pub purchase_price: f64,
    pub down_payment: f64,
    pub gross_rents: f64,
    pub other_income: f64,
    /// Percent of gross rents.
    pub vacancy_rate: f64,
    pub taxes: f64,
    pub insurance: f64,
    pub repairs: f64,
    pub management: f64,
    pub utilities: f64,
    pub admin: f64,
    pub units: f64,
    /// Annual nominal percent.
    pub interest_rate: f64,
    /// Years.
    pub amortization: f64,
    /// Percent.
    pub market_cap_rate: f64,
    pub address: String,
    pub year_built: u32,
}

impl Default for DealInputs {
    fn default() -> Self {
        Self {
            purchase_price: 0.0,
            down_payment: 0.0,
            gross_rents: 0.0,
            other_income: 0.0,
            vacancy_rate: 5.0,
            taxes: 0.0,
            insurance: 0.0,
            repairs: 0.0,
            management: 0.0,
            utilities: 0.0,
            admin: 0.0,
            units: 0.0,
            interest_rate: 6.5,
            amortization: 25.0,
            market_cap_rate: 6.0,
            address: String::new(),
            year_built: 0,
        }
    }
}

impl DealInputs {
    pub fn set_category_amount(&mut self, key: CategoryKey, amount: f64) {
        let slot = match key {
            CategoryKey::GrossRents => &mut self.gross_rents,
            CategoryKey::OtherIncome => &mut self.other_income,
            CategoryKey::Taxes => &mut self.taxes,
            CategoryKey::Insurance => &mut self.insurance,
            CategoryKey::Repairs => &mut self.repairs,
            CategoryKey::Management => &mut self.management,
            CategoryKey::Utilities => &mut self.utilities,
            CategoryKey::Admin => &mut self.admin,
        };
        *slot = amount;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealMetrics {
    pub effective_gross_income: f64,
    pub total_expenses: f64,
    pub noi: f64,
    pub loan_amount: f64,
    pub annual_debt_service: f64,
    pub cash_flow: f64,
    pub cash_on_cash: f64,
    pub cap_rate: f64,
    pub dscr: f64,
    pub expense_ratio: f64,
    pub market_value: f64,
    pub price_per_door: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub title: String,
    pub annual_impact: f64,
    pub rationale: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_camel_case() {
        let json = serde_json::to_string(&CategoryKey::GrossRents).unwrap();
        assert_eq!(json, "\"grossRents\"");
        let parsed: CategoryKey = serde_json::from_str("\"otherIncome\"").unwrap();
        assert_eq!(parsed, CategoryKey::OtherIncome);
    }

    #[test]
    fn test_income_categories() {
        let income: Vec<_> = CategoryKey::ALL.iter().filter(|k| k.is_income()).collect();
        assert_eq!(income, vec![&CategoryKey::GrossRents, &CategoryKey::OtherIncome]);
    }

    #[test]
    fn test_deal_inputs_partial_json_uses_defaults() {
        let inputs: DealInputs =
            serde_json::from_str(r#"{"purchasePrice": 1000000, "units": 10}"#).unwrap();
        assert_eq!(inputs.purchase_price, 1_000_000.0);
        assert_eq!(inputs.units, 10.0);
        assert_eq!(inputs.vacancy_rate, 5.0);
        assert_eq!(inputs.amortization, 25.0);
    }

    #[test]
    fn test_extracted_fields_flatten_totals() {
        let mut fields = ExtractedFields {
            address: Some("12 Elm St".to_string()),
            ..Default::default()
        };
        fields.totals.insert(CategoryKey::Taxes, 18000.0);
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value["taxes"], 18000.0);
        assert_eq!(value["address"], "12 Elm St");
        assert!(value.get("units").is_none());
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_set_category_amount_targets_field() {
        let mut inputs = DealInputs::default();
        inputs.set_category_amount(CategoryKey::Utilities, 35_000.0);
        inputs.set_category_amount(CategoryKey::OtherIncome, 12_000.0);
        assert_eq!(inputs.utilities, 35_000.0);
        assert_eq!(inputs.other_income, 12_000.0);
        assert_eq!(inputs.gross_rents, 0.0);
    }
}
