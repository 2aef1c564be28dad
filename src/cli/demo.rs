use crate::categorizer::extract_fields;
use crate::cli::analyze::print_report;
use crate::cli::suggest::print_suggestions;
use crate::error::Result;
use crate::importer::{normalize_rows, Payload};
use crate::models::DealInputs;
use crate::reports::{build_report, merge_extracted};
use crate::settings::load_settings;

/// A trimmed 24-unit T-12 as it might come out of a property manager's export.
pub(crate) const SAMPLE_T12: &str = "\
Trailing 12 Month Operating Statement
Property: 1418 Harbor View Drive
Total Units,24
INCOME,,
Gross Potential Rent,,240000
Laundry Income,,5000
Parking Income,,7000
EXPENSES,,
Real Estate Tax,,18000
Property Insurance,,10000
Repairs & Maintenance,,25000
Management Fee,,12000
Electric,,9000
Water & Sewer,,26000
Accounting & Legal,,8000
";

pub fn run() -> Result<()> {
    let settings = load_settings();
    let rows = normalize_rows(&Payload::Text(SAMPLE_T12.to_string()));
    let result = extract_fields(&rows);

    let mut inputs = DealInputs {
        purchase_price: 1_200_000.0,
        down_payment: 300_000.0,
        ..settings.base_inputs()
    };
    merge_extracted(&mut inputs, &result.fields);

    let report = build_report(inputs, result.itemization, settings.ancillary_fee_check);
    print_report(&report);
    println!();
    print_suggestions(&report.suggestions);
    Ok(())
}
