use std::path::Path;

use serde::Serialize;

use crate::cli::extract_document;
use crate::error::Result;
use crate::models::{CategoryKey, Itemization};

#[derive(Serialize)]
struct ItemRecord<'a> {
    kind: &'static str,
    category: CategoryKey,
    label: &'a str,
    amount: f64,
}

pub(crate) fn write_itemization<W: std::io::Write>(writer: W, itemization: &Itemization) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let income = itemization.income_items.iter().map(|i| ("income", i));
    let expense = itemization.expense_items.iter().map(|i| ("expense", i));
    let mut count = 0;
    for (kind, item) in income.chain(expense) {
        wtr.serialize(ItemRecord {
            kind,
            category: item.category,
            label: &item.label,
            amount: item.amount,
        })?;
        count += 1;
    }
    wtr.flush()?;
    Ok(count)
}

pub fn run(file: &Path, output: &Path) -> Result<()> {
    let result = extract_document(file)?;
    let out = std::fs::File::create(output)?;
    let count = write_itemization(out, &result.itemization)?;
    println!("Wrote {count} line items to {}", output.display());
    Ok(())
}
