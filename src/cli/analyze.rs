use colored::{ColoredString, Colorize};
use comfy_table::{Cell, Table};

use crate::cli::{resolve_deal, DealArgs};
use crate::error::Result;
use crate::fmt::{money, multiple, pct};
use crate::reports::{build_report, DealReport, Status};
use crate::settings::load_settings;

fn status_label(status: Status) -> ColoredString {
    match status {
        Status::Good => "good".green(),
        Status::Warning => "warning".yellow(),
        Status::Bad => "bad".red().bold(),
        Status::Neutral => "-".normal(),
    }
}

pub fn run(deal: &DealArgs, json: bool) -> Result<()> {
    let settings = load_settings();
    let (inputs, itemization) = resolve_deal(deal, &settings)?;
    let report = build_report(inputs, itemization, settings.ancillary_fee_check);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print_report(&report);
    Ok(())
}

pub(crate) fn print_report(report: &DealReport) {
    let inputs = &report.inputs;
    let m = &report.metrics;

    if !inputs.address.is_empty() {
        println!("{}", inputs.address.bold());
    }

    let mut table = Table::new();
    table.set_header(vec!["Operations", "Annual"]);
    table.add_row(vec![Cell::new("Effective Gross Income"), Cell::new(money(m.effective_gross_income))]);
    table.add_row(vec![Cell::new("Total Expenses"), Cell::new(money(m.total_expenses))]);
    table.add_row(vec![Cell::new("NOI".bold()), Cell::new(money(m.noi))]);
    table.add_row(vec![Cell::new("Debt Service"), Cell::new(money(m.annual_debt_service))]);
    let cash_flow = if m.cash_flow >= 0.0 {
        "Cash Flow".green().bold()
    } else {
        "Cash Flow".red().bold()
    };
    table.add_row(vec![Cell::new(cash_flow), Cell::new(money(m.cash_flow))]);
    println!("{table}");

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value", "Status", "Note"]);
    table.add_row(vec![
        Cell::new("Purchase Price"),
        Cell::new(money(inputs.purchase_price)),
        Cell::new(""),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Loan Amount"),
        Cell::new(money(m.loan_amount)),
        Cell::new(""),
        Cell::new(""),
    ]);
    for check in &report.health {
        let value = if check.metric == "DSCR" {
            multiple(check.value)
        } else {
            pct(check.value)
        };
        table.add_row(vec![
            Cell::new(check.metric),
            Cell::new(value),
            Cell::new(status_label(check.status)),
            Cell::new(&check.note),
        ]);
    }
    table.add_row(vec![Cell::new("Cap Rate"), Cell::new(pct(m.cap_rate)), Cell::new(""), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Market Value"),
        Cell::new(money(m.market_value)),
        Cell::new(""),
        Cell::new(format!("At a {}% market cap rate", inputs.market_cap_rate)),
    ]);
    table.add_row(vec![
        Cell::new("Price Per Door"),
        Cell::new(money(m.price_per_door)),
        Cell::new(""),
        Cell::new(""),
    ]);
    println!("\n{table}");

    let mut table = Table::new();
    table.set_header(vec!["Year", "Equity"]);
    for point in &report.projection {
        table.add_row(vec![Cell::new(point.year), Cell::new(money(point.equity))]);
    }
    println!("\n5-Year Equity Projection\n{table}");

    if !report.itemization.is_empty() {
        println!(
            "\nItemized: {} income ({}), {} expense ({})",
            report.itemization.income_items.len(),
            money(report.itemization.income_total()),
            report.itemization.expense_items.len(),
            money(report.itemization.expense_total()),
        );
    }
}
