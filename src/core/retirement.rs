use super::error::{CalcError, CalcResult, require_non_negative};
use super::solver::contribution_for_target;
use super::types::{RetirementPlan, RetirementProfile};

/// Age the corpus is assumed to last until.
pub const LIFE_EXPECTANCY_AGE: u32 = 85;
/// Sustainable yearly withdrawal as a share of the corpus (the 4% rule).
pub const SAFE_WITHDRAWAL_RATE: f64 = 0.04;

pub fn plan_retirement(profile: &RetirementProfile) -> CalcResult<RetirementPlan> {
    if profile.retirement_age <= profile.current_age {
        return Err(CalcError::invalid(
            "retirement_age",
            "must be greater than current_age",
        ));
    }
    let income = require_non_negative("current_annual_income", profile.current_annual_income)?;
    let savings = require_non_negative("current_savings", profile.current_savings)?;
    let inflation = require_non_negative("inflation_percent", profile.inflation_percent)?;
    let expected_return =
        require_non_negative("expected_return_percent", profile.expected_return_percent)?;
    let expense_ratio = require_non_negative("expense_ratio", profile.expense_ratio)?;

    let years_to_retirement = profile.retirement_age - profile.current_age;
    let years_in_retirement = LIFE_EXPECTANCY_AGE.saturating_sub(profile.retirement_age);
    let years = years_to_retirement as f64;

    let monthly_expense = income * expense_ratio / 12.0 * (1.0 + inflation / 100.0).powf(years);
    let required_corpus = monthly_expense * 12.0 / SAFE_WITHDRAWAL_RATE;
    let future_savings = savings * (1.0 + expected_return / 100.0).powf(years);
    let additional_corpus_needed = (required_corpus - future_savings).max(0.0);

    let months = years * 12.0;
    let monthly_contribution_needed =
        contribution_for_target(additional_corpus_needed, expected_return, months);

    Ok(RetirementPlan {
        required_corpus,
        monthly_contribution_needed,
        projected_monthly_expense_at_retirement: monthly_expense,
        future_value_of_current_savings: future_savings,
        additional_corpus_needed,
        total_investment_needed: monthly_contribution_needed * months + savings,
        years_to_retirement,
        years_in_retirement,
    })
}
