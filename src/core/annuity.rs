use super::amortization::monthly_rate;
use super::error::{CalcResult, periods_in, require_non_negative};
use super::types::{ContributionPlan, LumpSumPlan, LumpSumResult, ProjectionResult};

/// Projects a monthly contribution stream, stepping the contribution up once a
/// year from month 13 onwards.
///
/// A contribution is made in every whole month up to `horizon_years * 12`;
/// each one compounds for the remaining, possibly fractional, months.
/// Values stay unrounded; callers round at presentation.
pub fn project_annuity(plan: &ContributionPlan) -> CalcResult<ProjectionResult> {
    let mut contribution =
        require_non_negative("periodic_contribution", plan.periodic_contribution)?;
    let annual_return = require_non_negative("annual_return_percent", plan.annual_return_percent)?;
    let step_up = require_non_negative("annual_step_up_percent", plan.annual_step_up_percent)?;
    let total_months = periods_in("horizon_years", plan.horizon_years)?;

    let growth = 1.0 + monthly_rate(annual_return);
    let mut maturity_value = 0.0;
    let mut contributed_principal = 0.0;

    let mut month: u32 = 1;
    while f64::from(month) <= total_months {
        if step_up > 0.0 && month > 1 && (month - 1) % 12 == 0 {
            contribution *= 1.0 + step_up / 100.0;
        }
        let months_invested = total_months - f64::from(month);
        maturity_value += contribution * growth.powf(months_invested);
        contributed_principal += contribution;
        month += 1;
    }

    Ok(ProjectionResult {
        maturity_value,
        contributed_principal,
        gains: maturity_value - contributed_principal,
    })
}

pub fn project_lump_sum(plan: &LumpSumPlan) -> CalcResult<LumpSumResult> {
    let principal = require_non_negative("principal", plan.principal)?;
    let annual_return = require_non_negative("annual_return_percent", plan.annual_return_percent)?;
    let years = require_non_negative("horizon_years", plan.horizon_years)?;

    let maturity_value = principal * (1.0 + annual_return / 100.0).powf(years);
    Ok(LumpSumResult {
        maturity_value,
        gains: maturity_value - principal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn plan(contribution: f64, annual_return: f64, years: f64, step_up: f64) -> ContributionPlan {
        ContributionPlan {
            periodic_contribution: contribution,
            annual_return_percent: annual_return,
            horizon_years: years,
            annual_step_up_percent: step_up,
        }
    }

    #[test]
    fn step_up_does_not_apply_inside_first_year() {
        let result = project_annuity(&plan(10_000.0, 12.0, 1.0, 10.0)).expect("valid plan");
        assert_approx(result.contributed_principal, 120_000.0);

        let flat = project_annuity(&plan(10_000.0, 12.0, 1.0, 0.0)).expect("valid plan");
        assert_approx(result.maturity_value, flat.maturity_value);
    }

    #[test]
    fn step_up_applies_from_thirteenth_month() {
        let result = project_annuity(&plan(10_000.0, 0.0, 2.0, 10.0)).expect("valid plan");
        assert_approx(result.contributed_principal, 120_000.0 + 132_000.0);
        assert_approx(result.gains, 0.0);
    }

    #[test]
    fn fractional_horizon_contributes_in_whole_months_only() {
        // 1.3 years is 15.6 months: fifteen contributions, three of them stepped up.
        let result = project_annuity(&plan(1_000.0, 0.0, 1.3, 10.0)).expect("valid plan");
        assert_approx(result.contributed_principal, 12_000.0 + 3.0 * 1_100.0);
        assert_approx(result.maturity_value, result.contributed_principal);

        // The leftover 0.6 month still compounds every contribution.
        let result = project_annuity(&plan(1_000.0, 12.0, 2.3, 0.0)).expect("valid plan");
        let expected: f64 = (1..=27).map(|m| 1_000.0 * 1.01_f64.powf(27.6 - m as f64)).sum();
        assert!((result.maturity_value - expected).abs() < 1e-6);
        assert_approx(result.contributed_principal, 27_000.0);
    }

    #[test]
    fn flat_plan_matches_closed_form_ordinary_annuity() {
        let result = project_annuity(&plan(5_000.0, 12.0, 10.0, 0.0)).expect("valid plan");
        let r: f64 = 0.01;
        let n = 120;
        let closed_form = 5_000.0 * ((1.0 + r).powi(n) - 1.0) / r;
        assert!((result.maturity_value - closed_form).abs() / closed_form < 1e-9);
        assert_approx(result.contributed_principal, 600_000.0);
        assert_approx(result.gains, result.maturity_value - 600_000.0);
    }

    #[test]
    fn zero_return_accumulates_contributions_only() {
        let result = project_annuity(&plan(1_000.0, 0.0, 3.0, 0.0)).expect("valid plan");
        assert_approx(result.maturity_value, 36_000.0);
        assert_approx(result.gains, 0.0);
    }

    #[test]
    fn rejects_negative_inputs_and_empty_horizon() {
        assert!(project_annuity(&plan(-1.0, 12.0, 1.0, 0.0)).is_err());
        assert!(project_annuity(&plan(1_000.0, -1.0, 1.0, 0.0)).is_err());
        assert!(project_annuity(&plan(1_000.0, 12.0, 0.0, 0.0)).is_err());
        assert!(project_annuity(&plan(1_000.0, 12.0, 1.0, -5.0)).is_err());
    }

    #[test]
    fn lump_sum_compounds_annually() {
        let result = project_lump_sum(&LumpSumPlan {
            principal: 100_000.0,
            annual_return_percent: 10.0,
            horizon_years: 2.0,
        })
        .expect("valid plan");
        assert_approx(result.maturity_value, 121_000.0);
        assert_approx(result.gains, 21_000.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_gains_are_non_negative_and_consistent(
            contribution in 500u32..200_000,
            return_bp in 100u32..5_000,
            years in 1u32..50,
            step_up in 0u32..50
        ) {
            let result = project_annuity(&plan(
                contribution as f64,
                return_bp as f64 / 100.0,
                years as f64,
                step_up as f64,
            ))
            .expect("valid plan");
            prop_assert!(result.gains >= 0.0);
            prop_assert!(result.maturity_value >= result.contributed_principal);
            let identity = result.maturity_value - result.contributed_principal - result.gains;
            prop_assert!(identity.abs() <= 1e-6 * result.maturity_value.max(1.0));
        }

        #[test]
        fn prop_step_up_never_lowers_contributions(
            contribution in 500u32..200_000,
            years in 1u32..50,
            step_up in 1u32..50
        ) {
            let flat = project_annuity(&plan(contribution as f64, 12.0, years as f64, 0.0))
                .expect("valid plan");
            let stepped =
                project_annuity(&plan(contribution as f64, 12.0, years as f64, step_up as f64))
                    .expect("valid plan");
            let extra = stepped.contributed_principal - flat.contributed_principal;
            prop_assert!(extra + 1e-6 >= 0.0);
            if years == 1 {
                prop_assert!(extra.abs() < 1e-6);
            }
        }
    }
}
