use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{resolve_deal, DealArgs};
use crate::error::Result;
use crate::finance::analyze;
use crate::fmt::money;
use crate::models::Suggestion;
use crate::optimizer::{suggest, AncillaryFeeCheck};
use crate::settings::load_settings;

pub fn run(deal: &DealArgs, limit: Option<usize>, per_candidate_fees: bool, json: bool) -> Result<()> {
    let settings = load_settings();
    let (inputs, itemization) = resolve_deal(deal, &settings)?;
    let fee_check = if per_candidate_fees {
        AncillaryFeeCheck::PerCandidate
    } else {
        settings.ancillary_fee_check
    };

    let metrics = analyze(&inputs);
    let mut suggestions = suggest(&inputs, &metrics, &itemization, fee_check);
    if let Some(n) = limit {
        suggestions.truncate(n);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }
    print_suggestions(&suggestions);
    Ok(())
}

pub(crate) fn print_suggestions(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("No opportunities found; the deal is already at benchmark.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["#", "Opportunity", "Annual Impact", "Why"]);
    for (i, s) in suggestions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&s.title),
            Cell::new(money(s.annual_impact).green()),
            Cell::new(&s.rationale),
        ]);
    }
    let total: f64 = suggestions.iter().map(|s| s.annual_impact).sum();
    println!("Profit & Overhead Opportunities\n{table}");
    println!("Combined upside if every idea lands: {}", money(total).bold());
}
