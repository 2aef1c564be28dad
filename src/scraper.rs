use crate::importer::find_number;
use crate::models::Row;

/// Header rows scanned for property metadata.
pub const META_ROW_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMeta {
    pub address: Option<String>,
    pub units: Option<f64>,
}

pub fn scrape_metadata(rows: &[Row]) -> PropertyMeta {
    let mut meta = PropertyMeta::default();
    for row in rows.iter().take(META_ROW_LIMIT) {
        let joined = row.join(" ");
        let lower = joined.to_lowercase();

        if meta.address.is_none() && (lower.contains("property:") || lower.contains("building:")) {
            meta.address = address_candidate(&joined);
        }

        if meta.units.is_none() && (lower.contains("units") || lower.contains("unit count")) {
            meta.units = row
                .iter()
                .map(|cell| find_number(cell))
                .find(|n| *n > 0.0 && *n < 10000.0);
        }

        if meta.address.is_some() && meta.units.is_some() {
            break;
        }
    }
    meta
}

/// Text between the first and second colon, if it is more than a stub.
fn address_candidate(joined: &str) -> Option<String> {
    let candidate = joined.split(':').nth(1)?.trim();
    (candidate.chars().count() > 3).then(|| candidate.to_string())
}
