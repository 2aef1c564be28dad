pub mod analyze;
pub mod config;
pub mod demo;
pub mod export;
pub mod extract;
pub mod suggest;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::categorizer::{extract_fields, CategorizeResult};
use crate::error::{DealError, Result};
use crate::importer::{load_document, normalize_rows};
use crate::models::{DealInputs, Itemization};
use crate::reports::{estimate_acquisition, merge_extracted};
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "dealsheet",
    version,
    about = "Underwrite multifamily deals from T-12 operating statements."
)]
pub struct Cli {
    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract line items and property details from a T-12 document.
    Extract {
        /// Spreadsheet (xlsx/xls/ods) or text/CSV file
        file: PathBuf,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Compute deal metrics, health checks and a 5-year equity projection.
    Analyze {
        #[command(flatten)]
        deal: DealArgs,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Rank value-add opportunities by annual impact.
    Suggest {
        #[command(flatten)]
        deal: DealArgs,
        /// Show at most this many suggestions
        #[arg(long)]
        limit: Option<usize>,
        /// Let each fee idea be suppressed only by its own income line
        #[arg(long = "per-candidate-fees")]
        per_candidate_fees: bool,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Write extracted line items to CSV.
    Export {
        /// Spreadsheet or text/CSV file to extract from
        file: PathBuf,
        /// Output CSV path
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Run the full analysis on a built-in sample deal.
    Demo,
    /// View or change underwriting assumptions.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current settings and where they are stored.
    Show,
    /// Change a setting, e.g. `config set interest_rate 7.25`.
    Set {
        key: String,
        value: String,
    },
}

/// Where a deal comes from. Later sources win: settings, `--deal` JSON,
/// the extracted document, then explicit flags.
#[derive(Args, Debug, Default)]
pub struct DealArgs {
    /// T-12 document to extract figures from
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Deal inputs as JSON (camelCase keys, any subset)
    #[arg(long)]
    pub deal: Option<PathBuf>,
    #[arg(long)]
    pub purchase_price: Option<f64>,
    #[arg(long)]
    pub down_payment: Option<f64>,
    #[arg(long)]
    pub gross_rents: Option<f64>,
    #[arg(long)]
    pub other_income: Option<f64>,
    /// Percent of gross rents
    #[arg(long)]
    pub vacancy_rate: Option<f64>,
    #[arg(long)]
    pub taxes: Option<f64>,
    #[arg(long)]
    pub insurance: Option<f64>,
    #[arg(long)]
    pub repairs: Option<f64>,
    #[arg(long)]
    pub management: Option<f64>,
    #[arg(long)]
    pub utilities: Option<f64>,
    #[arg(long)]
    pub admin: Option<f64>,
    #[arg(long)]
    pub units: Option<f64>,
    /// Annual percent
    #[arg(long)]
    pub interest_rate: Option<f64>,
    /// Years
    #[arg(long)]
    pub amortization: Option<f64>,
    /// Percent
    #[arg(long)]
    pub market_cap_rate: Option<f64>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub year_built: Option<u32>,
}

impl DealArgs {
    fn apply_overrides(&self, inputs: &mut DealInputs) {
        let numeric = [
            (self.purchase_price, &mut inputs.purchase_price),
            (self.down_payment, &mut inputs.down_payment),
            (self.gross_rents, &mut inputs.gross_rents),
            (self.other_income, &mut inputs.other_income),
            (self.vacancy_rate, &mut inputs.vacancy_rate),
            (self.taxes, &mut inputs.taxes),
            (self.insurance, &mut inputs.insurance),
            (self.repairs, &mut inputs.repairs),
            (self.management, &mut inputs.management),
            (self.utilities, &mut inputs.utilities),
            (self.admin, &mut inputs.admin),
            (self.units, &mut inputs.units),
            (self.interest_rate, &mut inputs.interest_rate),
            (self.amortization, &mut inputs.amortization),
            (self.market_cap_rate, &mut inputs.market_cap_rate),
        ];
        for (value, slot) in numeric {
            if let Some(v) = value {
                *slot = v;
            }
        }
        if let Some(address) = &self.address {
            inputs.address = address.clone();
        }
        if let Some(year) = self.year_built {
            inputs.year_built = year;
        }
    }
}

/// Reads and categorizes a document, failing when nothing usable came out.
pub(crate) fn extract_document(path: &Path) -> Result<CategorizeResult> {
    let payload = load_document(path)?;
    let rows = normalize_rows(&payload);
    let result = extract_fields(&rows);
    tracing::info!(
        path = %path.display(),
        rows = rows.len(),
        fields = result.fields.len(),
        "extracted document"
    );
    if result.fields.is_empty() {
        return Err(DealError::NoData(
            "No standard T-12 keywords found.".to_string(),
        ));
    }
    Ok(result)
}

/// Builds the deal and its itemization from every source in [`DealArgs`].
pub(crate) fn resolve_deal(args: &DealArgs, settings: &Settings) -> Result<(DealInputs, Itemization)> {
    let mut inputs = match &args.deal {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let mut value: serde_json::Value = serde_json::from_str(&content)?;
            let base = serde_json::to_value(settings.base_inputs())?;
            // Keys missing from the file keep the configured assumptions.
            if let (Some(obj), serde_json::Value::Object(defaults)) = (value.as_object_mut(), base) {
                for (k, v) in defaults {
                    obj.entry(k).or_insert(v);
                }
            }
            serde_json::from_value(value)?
        }
        None => settings.base_inputs(),
    };

    let mut itemization = Itemization::default();
    if let Some(path) = &args.file {
        let result = extract_document(path)?;
        merge_extracted(&mut inputs, &result.fields);
        itemization = result.itemization;
    }

    args.apply_overrides(&mut inputs);
    estimate_acquisition(&mut inputs, settings.noi_margin, settings.down_payment_pct);
    Ok((inputs, itemization))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_deal_flags() {
        let cli = Cli::parse_from([
            "dealsheet",
            "analyze",
            "--purchase-price",
            "1200000",
            "--units",
            "24",
            "--json",
        ]);
        match cli.command {
            Commands::Analyze { deal, json } => {
                assert!(json);
                assert_eq!(deal.purchase_price, Some(1_200_000.0));
                assert_eq!(deal.units, Some(24.0));
                assert_eq!(deal.taxes, None);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_resolve_deal_layers_sources() {
        let dir = tempfile::tempdir().unwrap();
        let deal_path = dir.path().join("deal.json");
        std::fs::write(&deal_path, r#"{"purchasePrice": 1000000, "downPayment": 250000, "taxes": 5}"#).unwrap();
        let doc_path = dir.path().join("t12.csv");
        std::fs::write(&doc_path, "Property: 450 Oak Ave\nReal Estate Tax,18000\nWater,9000\n").unwrap();

        let mut settings = Settings::default();
        settings.interest_rate = 7.0;
        let args = DealArgs {
            file: Some(doc_path),
            deal: Some(deal_path),
            utilities: Some(12_000.0),
            ..Default::default()
        };
        let (inputs, itemization) = resolve_deal(&args, &settings).unwrap();
        assert_eq!(inputs.purchase_price, 1_000_000.0);
        assert_eq!(inputs.interest_rate, 7.0);
        assert_eq!(inputs.taxes, 18_000.0);
        assert_eq!(inputs.utilities, 12_000.0);
        assert_eq!(inputs.address, "450 Oak Ave");
        assert_eq!(itemization.expense_items.len(), 2);
    }

    #[test]
    fn test_resolve_deal_estimates_price() {
        let args = DealArgs {
            gross_rents: Some(240_000.0),
            ..Default::default()
        };
        let (inputs, _) = resolve_deal(&args, &Settings::default()).unwrap();
        assert_eq!(inputs.purchase_price, 2_200_000.0);
        assert_eq!(inputs.down_payment, 550_000.0);
    }

    #[test]
    fn test_resolve_deal_keeps_down_payment_flag() {
        let args = DealArgs {
            gross_rents: Some(240_000.0),
            down_payment: Some(100_000.0),
            ..Default::default()
        };
        let (inputs, _) = resolve_deal(&args, &Settings::default()).unwrap();
        assert_eq!(inputs.purchase_price, 2_200_000.0);
        assert_eq!(inputs.down_payment, 100_000.0);
    }

    #[test]
    fn test_extract_document_without_keywords_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "nothing to see here\n").unwrap();
        assert!(matches!(extract_document(&path), Err(DealError::NoData(_))));
    }
}
