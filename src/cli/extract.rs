use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::extract_document;
use crate::error::Result;
use crate::fmt::money_cents;
use crate::models::{CategoryKey, LineItem};

pub fn run(file: &Path, json: bool) -> Result<()> {
    let result = extract_document(file)?;

    if json {
        let value = serde_json::json!({
            "fields": result.fields,
            "itemization": result.itemization,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Extracted {} data points.", result.fields.len());
    if let Some(address) = &result.fields.address {
        println!("Property:  {address}");
    }
    if let Some(units) = result.fields.units {
        println!("Units:     {units}");
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Total"]);
    for key in CategoryKey::ALL {
        if let Some(total) = result.fields.total(key) {
            table.add_row(vec![Cell::new(key.name()), Cell::new(money_cents(total))]);
        }
    }
    println!("\nCategory Totals\n{table}");

    print_items("INCOME ITEMS".green().bold().to_string(), &result.itemization.income_items);
    print_items("EXPENSE ITEMS".red().bold().to_string(), &result.itemization.expense_items);
    Ok(())
}

pub(crate) fn print_items(title: String, items: &[LineItem]) {
    if items.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Line", "Category", "Amount"]);
    for item in items {
        table.add_row(vec![
            Cell::new(&item.label),
            Cell::new(item.category.name()),
            Cell::new(money_cents(item.amount)),
        ]);
    }
    let total: f64 = items.iter().map(|i| i.amount).sum();
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(money_cents(total)),
    ]);
    println!("\n{title}\n{table}");
}
