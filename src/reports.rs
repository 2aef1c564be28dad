use serde::Serialize;

use crate::finance::analyze;
use crate::models::{DealInputs, DealMetrics, ExtractedFields, Itemization, Suggestion};
use crate::optimizer::{suggest, AncillaryFeeCheck};

pub const DSCR_TARGET: f64 = 1.25;
pub const CASH_ON_CASH_TARGET: f64 = 10.0;
pub const EXPENSE_RATIO_FLOOR: f64 = 35.0;

/// Equity multipliers on the down payment for years 1 through 5.
const EQUITY_GROWTH: [f64; 5] = [1.00, 1.05, 1.10, 1.15, 1.22];

// ---------------------------------------------------------------------------
// Deal assembly
// ---------------------------------------------------------------------------

/// Copies everything a document produced onto the deal, overwriting.
pub fn merge_extracted(inputs: &mut DealInputs, fields: &ExtractedFields) {
    if let Some(address) = &fields.address {
        inputs.address = address.clone();
    }
    if let Some(units) = fields.units {
        inputs.units = units;
    }
    for (key, total) in &fields.totals {
        inputs.set_category_amount(*key, *total);
    }
}

/// Fills in a price for a deal that only has rents, capitalizing
/// `gross_rents * noi_margin` at the market cap rate. A down payment already
/// on the deal is kept. Returns whether anything was estimated.
pub fn estimate_acquisition(inputs: &mut DealInputs, noi_margin: f64, down_payment_pct: f64) -> bool {
    if inputs.purchase_price > 0.0 || inputs.gross_rents <= 0.0 || inputs.market_cap_rate <= 0.0 {
        return false;
    }
    let estimated_noi = inputs.gross_rents * noi_margin;
    inputs.purchase_price = (estimated_noi / (inputs.market_cap_rate / 100.0)).round();
    if inputs.down_payment <= 0.0 {
        inputs.down_payment = (inputs.purchase_price * down_payment_pct / 100.0).round();
    }
    tracing::info!(
        purchase_price = inputs.purchase_price,
        down_payment = inputs.down_payment,
        "estimated acquisition from gross rents"
    );
    true
}

// ---------------------------------------------------------------------------
// Health checks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Good,
    Warning,
    Bad,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheck {
    pub metric: &'static str,
    pub value: f64,
    pub status: Status,
    pub note: String,
}

pub fn assess(metrics: &DealMetrics) -> Vec<HealthCheck> {
    let dscr = if metrics.dscr >= DSCR_TARGET {
        HealthCheck {
            metric: "DSCR",
            value: metrics.dscr,
            status: Status::Good,
            note: format!("Covers debt at {:.2}x", metrics.dscr),
        }
    } else {
        HealthCheck {
            metric: "DSCR",
            value: metrics.dscr,
            status: Status::Bad,
            note: format!("{:.2} is below the {DSCR_TARGET} safe threshold", metrics.dscr),
        }
    };

    let coc_status = if metrics.cash_on_cash >= CASH_ON_CASH_TARGET {
        Status::Good
    } else {
        Status::Warning
    };
    let cash_on_cash = HealthCheck {
        metric: "Cash on Cash",
        value: metrics.cash_on_cash,
        status: coc_status,
        note: format!("Target {CASH_ON_CASH_TARGET}%+"),
    };

    let expense_ratio = if metrics.expense_ratio < EXPENSE_RATIO_FLOOR {
        HealthCheck {
            metric: "Expense Ratio",
            value: metrics.expense_ratio,
            status: Status::Warning,
            note: format!("Under {EXPENSE_RATIO_FLOOR}%; verify nothing is missing from expenses"),
        }
    } else {
        HealthCheck {
            metric: "Expense Ratio",
            value: metrics.expense_ratio,
            status: Status::Neutral,
            note: String::new(),
        }
    };

    vec![dscr, cash_on_cash, expense_ratio]
}

// ---------------------------------------------------------------------------
// Equity projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquityPoint {
    pub year: u32,
    pub equity: f64,
}

/// Down payment grown by a fixed schedule plus cash flow retained from
/// prior years.
pub fn equity_projection(inputs: &DealInputs, metrics: &DealMetrics) -> Vec<EquityPoint> {
    EQUITY_GROWTH
        .iter()
        .enumerate()
        .map(|(i, growth)| EquityPoint {
            year: i as u32 + 1,
            equity: inputs.down_payment * growth + metrics.cash_flow * i as f64,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Full report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealReport {
    pub inputs: DealInputs,
    pub metrics: DealMetrics,
    pub itemization: Itemization,
    pub suggestions: Vec<Suggestion>,
    pub health: Vec<HealthCheck>,
    pub projection: Vec<EquityPoint>,
}

pub fn build_report(
    inputs: DealInputs,
    itemization: Itemization,
    fee_check: AncillaryFeeCheck,
) -> DealReport {
    let metrics = analyze(&inputs);
    let suggestions = suggest(&inputs, &metrics, &itemization, fee_check);
    DealReport {
        health: assess(&metrics),
        projection: equity_projection(&inputs, &metrics),
        inputs,
        metrics,
        itemization,
        suggestions,
    }
}
