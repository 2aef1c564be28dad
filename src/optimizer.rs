use serde::{Deserialize, Serialize};

use crate::models::{DealInputs, DealMetrics, Itemization, Suggestion};

const TARGET_MANAGEMENT_PCT: f64 = 0.03;
const RUBS_RECAPTURE_PCT: f64 = 0.15;
const REPAIRS_PER_DOOR_LIMIT: f64 = 500.0;
const REPAIRS_REDUCTION_PCT: f64 = 0.10;
const TARGET_OTHER_INCOME_PCT: f64 = 0.05;
const ADMIN_PER_DOOR_LIMIT: f64 = 150.0;
const ADMIN_REDUCTION_PCT: f64 = 0.10;
const TARGET_VACANCY_RATE: f64 = 5.0;
const PET_RENT_MONTHLY: f64 = 20.0;
const PARKING_MONTHLY: f64 = 10.0;
const UTILITY_BILLBACK_PCT: f64 = 0.10;

/// How existing income labels suppress ancillary-fee ideas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AncillaryFeeCheck {
    /// Any pet, parking or utility-billback label suppresses every fee idea.
    #[default]
    Combined,
    /// Each fee idea is suppressed only by a label naming that same fee.
    PerCandidate,
}

impl AncillaryFeeCheck {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::PerCandidate => "per_candidate",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "combined" => Some(Self::Combined),
            "per_candidate" => Some(Self::PerCandidate),
            _ => None,
        }
    }
}

struct FeeCandidate {
    label: &'static str,
    keyword: &'static str,
    amount: f64,
}

const FEE_KEYWORDS: &[&str] = &["pet", "parking", "utility billback"];

fn per_door(amount: f64, units: f64) -> f64 {
    if units > 0.0 {
        amount / units
    } else {
        amount
    }
}

fn push(suggestions: &mut Vec<Suggestion>, title: impl Into<String>, impact: f64, rationale: &str) {
    suggestions.push(Suggestion {
        title: title.into(),
        annual_impact: impact.max(0.0),
        rationale: rationale.to_string(),
    });
}

/// Ranked value-add ideas for a deal, largest annual impact first.
///
/// Each rule looks at the deal on its own; a deal can trip all of them.
pub fn suggest(
    inputs: &DealInputs,
    metrics: &DealMetrics,
    itemization: &Itemization,
    fee_check: AncillaryFeeCheck,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let units = inputs.units;
    let egi = metrics.effective_gross_income;

    let target_mgmt = egi * TARGET_MANAGEMENT_PCT;
    if inputs.management > target_mgmt && target_mgmt > 0.0 {
        push(
            &mut suggestions,
            "Bring management down to 3% of EGI",
            inputs.management - target_mgmt,
            "Stabilized multifamily typically runs near 3%; renegotiate or re-bid the contract.",
        );
    }

    let utilities = inputs.utilities;
    if utilities > 0.0 {
        push(
            &mut suggestions,
            "Recapture 15% of utilities with RUBS",
            utilities * RUBS_RECAPTURE_PCT,
            "Ratio utility billing shifts part of owner-paid utilities to tenants.",
        );
    }

    if per_door(inputs.repairs, units) > REPAIRS_PER_DOOR_LIMIT {
        push(
            &mut suggestions,
            "Cut repairs 10% with a preventative maintenance program",
            inputs.repairs * REPAIRS_REDUCTION_PCT,
            "Consolidated vendors and scheduled upkeep reduce emergency work orders.",
        );
    }

    let target_other = inputs.gross_rents * TARGET_OTHER_INCOME_PCT;
    if inputs.other_income < target_other {
        push(
            &mut suggestions,
            "Grow other income to 5% of gross rents",
            target_other - inputs.other_income,
            "Pet rent, reserved parking and laundry upgrades are the usual levers.",
        );
    }

    if per_door(inputs.admin, units) > ADMIN_PER_DOOR_LIMIT {
        push(
            &mut suggestions,
            "Trim admin, legal and marketing 10%",
            inputs.admin * ADMIN_REDUCTION_PCT,
            "Audit subscriptions and shift marketing spend to digital listings.",
        );
    }

    if inputs.vacancy_rate > TARGET_VACANCY_RATE && inputs.gross_rents > 0.0 {
        push(
            &mut suggestions,
            "Stabilize vacancy at 5%",
            inputs.gross_rents * (inputs.vacancy_rate - TARGET_VACANCY_RATE) / 100.0,
            "Tighten the leasing funnel and renewals to reach market occupancy.",
        );
    }

    let labels: Vec<String> = itemization
        .income_items
        .iter()
        .map(|i| i.label.to_lowercase())
        .collect();
    let candidates = [
        FeeCandidate {
            label: "pet rent",
            keyword: "pet",
            amount: units * PET_RENT_MONTHLY * 12.0,
        },
        FeeCandidate {
            label: "reserved parking",
            keyword: "parking",
            amount: units * PARKING_MONTHLY * 12.0,
        },
        FeeCandidate {
            label: "utility billback",
            keyword: "utility billback",
            amount: utilities * UTILITY_BILLBACK_PCT,
        },
    ];
    for fee in &candidates {
        let covered = match fee_check {
            AncillaryFeeCheck::Combined => labels
                .iter()
                .any(|l| FEE_KEYWORDS.iter().any(|k| l.contains(k))),
            AncillaryFeeCheck::PerCandidate => labels.iter().any(|l| l.contains(fee.keyword)),
        };
        if !covered && fee.amount > 0.0 {
            push(
                &mut suggestions,
                format!("Add {}", fee.label),
                fee.amount,
                "Recurring ancillary income tenants already expect to pay for.",
            );
        }
    }

    suggestions.sort_by(|a, b| b.annual_impact.total_cmp(&a.annual_impact));
    suggestions
}
