use super::error::{CalcResult, require_non_negative};
use super::types::{PortfolioAllocation, RiskAppetite};

pub const EMERGENCY_FUND_MONTHS: f64 = 6.0;

impl RiskAppetite {
    fn equity_multiplier(self) -> f64 {
        match self {
            RiskAppetite::Low => 0.7,
            RiskAppetite::Medium => 1.0,
            RiskAppetite::High => 1.3,
        }
    }
}

/// Age-based split: equity starts from `100 - age`, scaled by risk appetite,
/// and the remainder goes 70/20/10 to debt, gold and cash.
pub fn optimal_allocation(age: u32, appetite: RiskAppetite) -> PortfolioAllocation {
    let base = (100.0 - age as f64).clamp(20.0, 80.0);
    let equity = (base * appetite.equity_multiplier()).round().clamp(10.0, 85.0) as u32;

    let remaining = 100 - equity;
    let debt = (remaining as f64 * 0.7).round() as u32;
    let gold = (remaining as f64 * 0.2).round() as u32;
    PortfolioAllocation {
        equity,
        debt,
        gold,
        cash: remaining - debt - gold,
    }
}

pub fn emergency_fund(monthly_expenses: f64) -> CalcResult<f64> {
    let monthly_expenses = require_non_negative("monthly_expenses", monthly_expenses)?;
    Ok(monthly_expenses * EMERGENCY_FUND_MONTHS)
}
