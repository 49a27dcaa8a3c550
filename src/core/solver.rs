use super::amortization::monthly_rate;
use super::error::{CalcResult, periods_in, require_non_negative};
use super::types::{GoalSpec, RequiredContribution};

/// Monthly contribution whose flat projection reaches `target_value` at the
/// end of the horizon.
pub fn solve_required_contribution(goal: &GoalSpec) -> CalcResult<RequiredContribution> {
    let target = require_non_negative("target_value", goal.target_value)?;
    let annual_return = require_non_negative("annual_return_percent", goal.annual_return_percent)?;
    let periods = periods_in("horizon_years", goal.horizon_years)?;

    let contribution = contribution_for_target(target, annual_return, periods);
    let total_contributed = contribution * periods;
    Ok(RequiredContribution {
        periodic_contribution: contribution,
        total_contributed,
        projected_surplus_or_deficit: target - total_contributed,
    })
}

pub(crate) fn contribution_for_target(target: f64, annual_return_percent: f64, n: f64) -> f64 {
    let r = monthly_rate(annual_return_percent);
    if r == 0.0 {
        return target / n;
    }
    target * r / ((1.0 + r).powf(n) - 1.0)
}
