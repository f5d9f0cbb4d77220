use super::types::{SipInputs, SipResult};

/// Below this monthly rate the annuity-due formula degenerates (division by
/// a vanishing rate) and the projection falls back to plain accumulation.
const DEGENERATE_RATE_EPS: f64 = 1e-12;

/// Projects the future value of a monthly SIP compounded at a fixed annual
/// rate, assuming each contribution is invested at the start of its month
/// (annuity-due).
///
/// The caller is responsible for keeping inputs inside sane domains; this
/// function never fails and only guards the zero-rate case.
pub fn project(inputs: &SipInputs) -> SipResult {
    let monthly_rate = inputs.annual_return_percent / 12.0 / 100.0;
    let months = inputs.years * 12.0;

    let future_value = if monthly_rate.abs() < DEGENERATE_RATE_EPS {
        inputs.monthly_amount * months
    } else {
        inputs.monthly_amount
            * (((1.0 + monthly_rate).powf(months) - 1.0) / monthly_rate)
            * (1.0 + monthly_rate)
    };

    let total_investment = inputs.monthly_amount * months;
    let estimated_returns = future_value - total_investment;

    // Each figure is rounded from its unrounded intermediate, not derived
    // from the other two.
    SipResult {
        total_investment: total_investment.round() as i64,
        estimated_returns: estimated_returns.round() as i64,
        total_value: future_value.round() as i64,
    }
}
