use super::error::{CalcError, CalcResult, periods_in, require_finite, require_positive};
use super::types::{AmortizationResult, LoanTerms};

pub const MAX_ANNUAL_RATE_PERCENT: f64 = 100.0;

pub fn amortize(terms: &LoanTerms) -> CalcResult<AmortizationResult> {
    let principal = require_positive("principal", terms.principal)?;
    let periods = periods_in("tenure_years", terms.tenure_years)?;
    let payment = payment_for(principal, terms.annual_rate_percent, periods)?;

    let total_paid = payment * periods;
    Ok(AmortizationResult {
        periodic_payment: payment,
        number_of_periods: periods,
        total_paid,
        total_interest: total_paid - principal,
    })
}

/// Equated monthly payment that fully repays `principal` over `periods` months.
///
/// `periods` may be fractional. A zero rate degrades to straight-line
/// repayment instead of dividing by zero.
pub fn payment_for(principal: f64, annual_rate_percent: f64, periods: f64) -> CalcResult<f64> {
    let rate = require_finite("annual_rate_percent", annual_rate_percent)?;
    if !(0.0..=MAX_ANNUAL_RATE_PERCENT).contains(&rate) {
        return Err(CalcError::invalid(
            "annual_rate_percent",
            "must be between 0 and 100",
        ));
    }
    let n = require_finite("periods", periods)?;
    if n < 1.0 {
        return Err(CalcError::invalid("periods", "must be >= 1"));
    }

    let r = monthly_rate(rate);
    if r == 0.0 {
        return Ok(principal / n);
    }
    let growth = (1.0 + r).powf(n);
    Ok(principal * r * growth / (growth - 1.0))
}

pub(crate) fn monthly_rate(annual_percent: f64) -> f64 {
    annual_percent / (12.0 * 100.0)
}
