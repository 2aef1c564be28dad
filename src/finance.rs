//! Closed-form deal math. Every ratio whose denominator is not positive is
//! reported as 0 so a half-filled deal still renders.

use crate::models::{DealInputs, DealMetrics};

/// Level-payment amortization, annualized.
///
/// `rate` is the annual nominal percent, `years` the amortization period.
pub fn mortgage_payment(principal: f64, rate: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    let monthly_rate = rate / 100.0 / 12.0;
    let payments = years * 12.0;
    let denominator = 1.0 - (1.0 + monthly_rate).powf(-payments);
    // Rates too small to move `1 + r` amortize straight-line.
    if monthly_rate <= 0.0 || denominator <= 0.0 {
        return principal / years;
    }
    principal * monthly_rate / denominator * 12.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn analyze(inputs: &DealInputs) -> DealMetrics {
    let gross_potential_income = inputs.gross_rents + inputs.other_income;
    let vacancy_loss = inputs.gross_rents * (inputs.vacancy_rate / 100.0);
    let effective_gross_income = gross_potential_income - vacancy_loss;

    let total_expenses = inputs.taxes
        + inputs.insurance
        + inputs.repairs
        + inputs.management
        + inputs.utilities
        + inputs.admin;
    let expense_ratio = ratio(total_expenses, effective_gross_income) * 100.0;

    let noi = effective_gross_income - total_expenses;
    let loan_amount = inputs.purchase_price - inputs.down_payment;
    let annual_debt_service =
        mortgage_payment(loan_amount, inputs.interest_rate, inputs.amortization);
    let cash_flow = noi - annual_debt_service;

    DealMetrics {
        effective_gross_income,
        total_expenses,
        noi,
        loan_amount,
        annual_debt_service,
        cash_flow,
        cash_on_cash: ratio(cash_flow, inputs.down_payment) * 100.0,
        cap_rate: ratio(noi, inputs.purchase_price) * 100.0,
        dscr: ratio(noi, annual_debt_service),
        expense_ratio,
        market_value: ratio(noi, inputs.market_cap_rate / 100.0),
        price_per_door: ratio(inputs.purchase_price, inputs.units),
    }
}
