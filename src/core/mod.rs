//! Pure financial calculators. Every function here is synchronous, has no
//! side effects and returns unrounded values; rounding belongs to callers.

mod allocation;
mod amortization;
mod annuity;
mod error;
mod retirement;
mod scenario;
mod solver;
mod tax;
mod types;

pub use allocation::{EMERGENCY_FUND_MONTHS, emergency_fund, optimal_allocation};
pub use amortization::{amortize, payment_for};
pub use annuity::{project_annuity, project_lump_sum};
pub use error::{CalcError, CalcResult};
pub use retirement::{LIFE_EXPECTANCY_AGE, SAFE_WITHDRAWAL_RATE, plan_retirement};
pub use scenario::{MAINTENANCE_RATE, compare_rent_vs_buy};
pub use solver::solve_required_contribution;
pub use tax::{
    CESS_RATE, SENIOR_CITIZEN_AGE, STANDARD_DEDUCTION_CAP, TaxBand, applicable_sections, bands,
    compute_tax, elss_tax_savings, marginal_rate_percent, slab_tax,
};
pub use types::{
    AmortizationResult, ContributionPlan, DeductionBreakdown, DeductionSection, ElssSavings,
    GoalSpec, HomePurchase, LoanTerms, LumpSumPlan, LumpSumResult, PortfolioAllocation,
    ProjectionResult, Recommendation, RentTerms, RentVsBuyResult, RequiredContribution,
    RetirementPlan, RetirementProfile, RiskAppetite, TaxProfile, TaxRegime, TaxResult,
};
