use std::io::Cursor;
use std::path::Path;
use std::sync::OnceLock;

use calamine::{Data, Reader};
use regex::Regex;

use crate::error::{DealError, Result};
use crate::models::Row;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d[\d,]*\.?\d*").expect("valid number regex"))
}

fn cell_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",|;|\t|\s{2,}").expect("valid delimiter regex"))
}

/// First numeric run in a cell, thousands separators removed. Cells with no
/// run, or a run that does not parse, are worth 0.
pub fn find_number(cell: &str) -> f64 {
    number_re()
        .find(cell)
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Document kinds
// ---------------------------------------------------------------------------

/// Raw document content handed over by whoever read the file.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Spreadsheet bytes (xlsx, xls, xlsb, ods).
    Grid(Vec<u8>),
    /// Delimited text or text already extracted from a page-oriented document.
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentKind {
    Grid,
    Text,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Ok(Self::Grid),
            "pdf" => Err(DealError::UnsupportedDocument(format!(
                "{}: extract the PDF text first and pass the .txt file",
                path.display()
            ))),
            _ => Ok(Self::Text),
        }
    }
}

pub fn load_document(path: &Path) -> Result<Payload> {
    let kind = DocumentKind::from_path(path)?;
    let data = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), ?kind, "loaded document");
    Ok(match kind {
        DocumentKind::Grid => Payload::Grid(data),
        DocumentKind::Text => Payload::Text(String::from_utf8_lossy(&data).into_owned()),
    })
}

// ---------------------------------------------------------------------------
// Row normalization
// ---------------------------------------------------------------------------

pub fn normalize_rows(payload: &Payload) -> Vec<Row> {
    match payload {
        Payload::Grid(bytes) => grid_rows(bytes),
        Payload::Text(text) => text_rows(text),
    }
}

fn text_rows(text: &str) -> Vec<Row> {
    let splitter = cell_split_re();
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| splitter.split(line).map(str::to_string).collect())
        .collect()
}

/// First sheet only. A payload calamine cannot read yields no rows.
fn grid_rows(bytes: &[u8]) -> Vec<Row> {
    let mut workbook = match calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())) {
        Ok(wb) => wb,
        Err(e) => {
            tracing::warn!("could not open workbook: {e}");
            return Vec::new();
        }
    };
    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            tracing::warn!("could not read first sheet: {e}");
            return Vec::new();
        }
        None => {
            tracing::warn!("workbook has no sheets");
            return Vec::new();
        }
    };
    range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_number() {
        assert_eq!(find_number("$18,000"), 18000.0);
        assert_eq!(find_number("1,234.56"), 1234.56);
        assert_eq!(find_number("  -42.50  "), -42.5);
        assert_eq!(find_number("Units: 24"), 24.0);
        assert_eq!(find_number("12."), 12.0);
    }

    #[test]
    fn test_find_number_takes_first_run() {
        assert_eq!(find_number("Jan 2024 total 5,000"), 2024.0);
    }

    #[test]
    fn test_find_number_without_digits_is_zero() {
        assert_eq!(find_number(""), 0.0);
        assert_eq!(find_number("Real Estate Tax"), 0.0);
        assert_eq!(find_number("-"), 0.0);
    }

    #[test]
    fn test_text_rows_split_on_all_delimiters() {
        let rows = normalize_rows(&Payload::Text(
            "Base Rent,240000\r\nLaundry;5000\nWater\t3,500\nPayroll    12000".to_string(),
        ));
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["Base Rent", "240000"]);
        assert_eq!(rows[1], vec!["Laundry", "5000"]);
        assert_eq!(rows[2], vec!["Water", "3", "500"]);
        assert_eq!(rows[3], vec!["Payroll", "12000"]);
    }

    #[test]
    fn test_text_rows_keep_single_spaces() {
        let rows = normalize_rows(&Payload::Text("Real Estate Tax $18000".to_string()));
        assert_eq!(rows, vec![vec!["Real Estate Tax $18000".to_string()]]);
    }

    #[test]
    fn test_text_rows_split_thousands_comma() {
        let rows = normalize_rows(&Payload::Text("Real Estate Tax $18,000".to_string()));
        assert_eq!(rows, vec![vec!["Real Estate Tax $18".to_string(), "000".to_string()]]);
    }

    #[test]
    fn test_text_rows_keep_blank_cells() {
        let rows = normalize_rows(&Payload::Text("a,,b".to_string()));
        assert_eq!(rows[0], vec!["a", "", "b"]);
    }

    #[test]
    fn test_corrupt_grid_yields_no_rows() {
        let rows = normalize_rows(&Payload::Grid(b"definitely not a workbook".to_vec()));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_grid_rows_first_sheet_only() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Property: 12 Elm Street").unwrap();
        sheet.write_string(1, 0, "Real Estate Tax").unwrap();
        sheet.write_number(1, 2, 18000.0).unwrap();
        let other = workbook.add_worksheet();
        other.write_string(0, 0, "ignored").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = normalize_rows(&Payload::Grid(bytes));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "Property: 12 Elm Street");
        assert_eq!(rows[1], vec!["Real Estate Tax", "", "18000"]);
    }

    #[test]
    fn test_document_kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("t12.XLSX")).unwrap(), DocumentKind::Grid);
        assert_eq!(DocumentKind::from_path(Path::new("t12.csv")).unwrap(), DocumentKind::Text);
        assert_eq!(DocumentKind::from_path(Path::new("notes")).unwrap(), DocumentKind::Text);
        assert!(matches!(
            DocumentKind::from_path(Path::new("t12.pdf")),
            Err(DealError::UnsupportedDocument(_))
        ));
    }

    #[test]
    fn test_load_document_reads_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t12.csv");
        std::fs::write(&path, "Water,3500\n").unwrap();
        match load_document(&path).unwrap() {
            Payload::Text(text) => assert_eq!(text, "Water,3500\n"),
            Payload::Grid(_) => panic!("expected text payload"),
        }
    }

    #[test]
    fn test_load_document_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, DealError::Io(_)));
    }
}
