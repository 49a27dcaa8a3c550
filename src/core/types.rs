use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub tenure_years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmortizationResult {
    pub periodic_payment: f64,
    /// `tenure_years * 12`, fractional when the tenure is.
    pub number_of_periods: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContributionPlan {
    pub periodic_contribution: f64,
    pub annual_return_percent: f64,
    pub horizon_years: f64,
    pub annual_step_up_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionResult {
    pub maturity_value: f64,
    pub contributed_principal: f64,
    pub gains: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumpSumPlan {
    pub principal: f64,
    pub annual_return_percent: f64,
    pub horizon_years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumpSumResult {
    pub maturity_value: f64,
    pub gains: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalSpec {
    pub target_value: f64,
    pub annual_return_percent: f64,
    pub horizon_years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequiredContribution {
    pub periodic_contribution: f64,
    pub total_contributed: f64,
    /// Target minus total contributed: the part of the goal funded by growth.
    pub projected_surplus_or_deficit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomePurchase {
    pub home_price: f64,
    pub down_payment: f64,
    pub loan_rate_percent: f64,
    pub loan_tenure_years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentTerms {
    pub monthly_rent: f64,
    pub annual_increase_percent: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Rent,
    Buy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentVsBuyResult {
    pub total_rent_cost: f64,
    pub total_buy_cost: f64,
    pub recommendation: Recommendation,
    pub savings: f64,
    pub emi: f64,
    pub loan_amount: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TaxRegime {
    #[serde(rename = "OLD_REGIME", alias = "LEGACY", alias = "legacy", alias = "old")]
    Legacy,
    #[serde(
        rename = "NEW_REGIME",
        alias = "SIMPLIFIED",
        alias = "simplified",
        alias = "new"
    )]
    Simplified,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum DeductionSection {
    #[serde(rename = "section80C")]
    Section80C,
    #[serde(rename = "section80D")]
    Section80D,
    #[serde(rename = "nps", alias = "section80CCD1B")]
    Nps,
    #[serde(rename = "section80E")]
    Section80E,
    #[serde(rename = "section80TTA")]
    Section80Tta,
    #[serde(rename = "section80TTB")]
    Section80Ttb,
    #[serde(rename = "section24")]
    Section24,
    #[serde(rename = "section80EE")]
    Section80Ee,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxProfile {
    pub gross_income: f64,
    pub regime: TaxRegime,
    pub taxpayer_age: u32,
    pub deductions_by_section: BTreeMap<DeductionSection, f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionBreakdown {
    pub standard_deduction: f64,
    #[serde(flatten)]
    pub sections: BTreeMap<DeductionSection, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxResult {
    pub taxable_income: f64,
    pub base_tax: f64,
    pub cess: f64,
    pub total_tax: f64,
    pub total_deductions: f64,
    pub effective_rate_percent: f64,
    pub tax_savings_vs_no_deductions: f64,
    pub breakdown: DeductionBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElssSavings {
    /// Part of the investment that counts towards the 80C ceiling.
    pub eligible_deduction: f64,
    pub tax_saved: f64,
    /// Investment net of the tax it saves.
    pub effective_investment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetirementProfile {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_annual_income: f64,
    pub current_savings: f64,
    pub inflation_percent: f64,
    pub expected_return_percent: f64,
    pub expense_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetirementPlan {
    pub required_corpus: f64,
    pub monthly_contribution_needed: f64,
    pub projected_monthly_expense_at_retirement: f64,
    pub future_value_of_current_savings: f64,
    pub additional_corpus_needed: f64,
    pub total_investment_needed: f64,
    pub years_to_retirement: u32,
    pub years_in_retirement: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskAppetite {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

/// Whole-percent split across asset classes; always sums to 100.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PortfolioAllocation {
    pub equity: u32,
    pub debt: u32,
    pub gold: u32,
    pub cash: u32,
}
