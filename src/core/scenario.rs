use super::amortization::payment_for;
use super::error::{CalcError, CalcResult, periods_in, require_non_negative, require_positive};
use super::types::{HomePurchase, Recommendation, RentTerms, RentVsBuyResult};

/// Yearly upkeep and property tax, as a share of the purchase price.
pub const MAINTENANCE_RATE: f64 = 0.02;

pub fn compare_rent_vs_buy(
    home: &HomePurchase,
    rent: &RentTerms,
    horizon_years: u32,
) -> CalcResult<RentVsBuyResult> {
    let home_price = require_positive("home_price", home.home_price)?;
    let down_payment = require_non_negative("down_payment", home.down_payment)?;
    if down_payment > home_price {
        return Err(CalcError::invalid("down_payment", "cannot exceed home_price"));
    }
    let tenure_months = periods_in("loan_tenure_years", home.loan_tenure_years)?;
    let monthly_rent = require_non_negative("monthly_rent", rent.monthly_rent)?;
    let rent_increase =
        require_non_negative("annual_increase_percent", rent.annual_increase_percent)?;
    if horizon_years == 0 {
        return Err(CalcError::invalid("horizon_years", "must be >= 1"));
    }

    let loan_amount = home_price - down_payment;
    let emi = payment_for(loan_amount, home.loan_rate_percent, tenure_months)?;

    let total_rent_cost = total_rent(monthly_rent, rent_increase, horizon_years);

    // EMIs stop once the loan is repaid; upkeep runs for the whole horizon.
    let horizon_months = horizon_years as f64 * 12.0;
    let emi_paid = emi * horizon_months.min(tenure_months);
    let maintenance = home_price * MAINTENANCE_RATE * horizon_years as f64;
    let total_buy_cost = down_payment + emi_paid + maintenance;

    let recommendation = if total_rent_cost > total_buy_cost {
        Recommendation::Buy
    } else {
        Recommendation::Rent
    };

    Ok(RentVsBuyResult {
        total_rent_cost,
        total_buy_cost,
        recommendation,
        savings: (total_rent_cost - total_buy_cost).abs(),
        emi,
        loan_amount,
    })
}

/// Rent escalates at each year end, so year one is charged the opening rent.
fn total_rent(monthly_rent: f64, annual_increase_percent: f64, years: u32) -> f64 {
    let escalation = 1.0 + annual_increase_percent / 100.0;
    let mut current = monthly_rent;
    let mut total = 0.0;
    for _ in 0..years {
        total += current * 12.0;
        current *= escalation;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::amortization::amortize;
    use crate::core::types::LoanTerms;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    fn home(price: f64, down: f64, rate: f64, tenure: f64) -> HomePurchase {
        HomePurchase {
            home_price: price,
            down_payment: down,
            loan_rate_percent: rate,
            loan_tenure_years: tenure,
        }
    }

    fn rent(monthly: f64, increase: f64) -> RentTerms {
        RentTerms {
            monthly_rent: monthly,
            annual_increase_percent: increase,
        }
    }

    #[test]
    fn first_year_rent_uses_opening_rent() {
        assert_approx(total_rent(20_000.0, 10.0, 1), 240_000.0);
        assert_approx(total_rent(20_000.0, 10.0, 2), 240_000.0 + 264_000.0);
        assert_approx(total_rent(20_000.0, 0.0, 5), 1_200_000.0);
    }

    #[test]
    fn buy_cost_combines_down_payment_emi_and_upkeep() {
        let result = compare_rent_vs_buy(
            &home(5_000_000.0, 1_000_000.0, 8.5, 20.0),
            &rent(20_000.0, 5.0),
            10,
        )
        .expect("valid scenario");

        let emi = amortize(&LoanTerms {
            principal: 4_000_000.0,
            annual_rate_percent: 8.5,
            tenure_years: 20.0,
        })
        .expect("valid loan")
        .periodic_payment;

        assert_approx(result.emi, emi);
        assert_approx(result.loan_amount, 4_000_000.0);
        assert_approx(
            result.total_buy_cost,
            1_000_000.0 + emi * 120.0 + 5_000_000.0 * 0.02 * 10.0,
        );
        assert_eq!(result.recommendation, Recommendation::Rent);
        assert_approx(result.savings, result.total_buy_cost - result.total_rent_cost);
    }

    #[test]
    fn expensive_rent_recommends_buying() {
        let result = compare_rent_vs_buy(
            &home(2_000_000.0, 2_000_000.0, 8.0, 20.0),
            &rent(50_000.0, 8.0),
            10,
        )
        .expect("valid scenario");
        assert_approx(result.emi, 0.0);
        assert_eq!(result.recommendation, Recommendation::Buy);
        assert_approx(result.savings, result.total_rent_cost - result.total_buy_cost);
    }

    #[test]
    fn emi_stops_after_tenure_while_upkeep_continues() {
        let purchase = home(3_000_000.0, 500_000.0, 9.0, 5.0);
        let at_tenure = compare_rent_vs_buy(&purchase, &rent(10_000.0, 0.0), 5).expect("valid");
        let beyond = compare_rent_vs_buy(&purchase, &rent(10_000.0, 0.0), 12).expect("valid");

        let extra_upkeep = 3_000_000.0 * MAINTENANCE_RATE * 7.0;
        assert_approx(beyond.total_buy_cost - at_tenure.total_buy_cost, extra_upkeep);
    }

    #[test]
    fn rejects_down_payment_above_price() {
        let err = compare_rent_vs_buy(
            &home(1_000_000.0, 1_500_000.0, 8.0, 20.0),
            &rent(10_000.0, 5.0),
            10,
        )
        .expect_err("down payment too large");
        assert!(err.to_string().contains("down_payment"));
    }

    #[test]
    fn rejects_zero_horizon() {
        assert!(
            compare_rent_vs_buy(&home(1_000_000.0, 0.0, 8.0, 20.0), &rent(10_000.0, 5.0), 0)
                .is_err()
        );
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_emi_accrual_is_capped_at_loan_tenure(
            price in 100_000u32..50_000_000,
            down_pct in 0u32..100,
            rate in 1u32..30,
            tenure in 5u32..30,
            horizon in 5u32..30
        ) {
            let price = price as f64;
            let purchase = home(price, price * down_pct as f64 / 100.0, rate as f64, tenure as f64);
            let result = compare_rent_vs_buy(&purchase, &rent(10_000.0, 5.0), horizon)
                .expect("valid scenario");
            let months = horizon.min(tenure) as f64 * 12.0;
            let expected = purchase.down_payment
                + result.emi * months
                + price * MAINTENANCE_RATE * horizon as f64;
            prop_assert!((result.total_buy_cost - expected).abs() <= 1e-6 * expected);
            prop_assert!(result.savings >= 0.0);
        }
    }
}
