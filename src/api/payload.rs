use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{
    ContributionPlan, DeductionBreakdown, DeductionSection, GoalSpec, HomePurchase, LoanTerms,
    LumpSumPlan, PortfolioAllocation, Recommendation, RentTerms, RetirementProfile, RiskAppetite,
    SENIOR_CITIZEN_AGE, TaxProfile, TaxRegime, amortize, applicable_sections, compare_rent_vs_buy,
    compute_tax, elss_tax_savings, emergency_fund, marginal_rate_percent, optimal_allocation,
    plan_retirement, project_annuity, project_lump_sum, solve_required_contribution,
};

const DEFAULT_EXPECTED_INFLATION: f64 = 6.0;
const DEFAULT_EXPECTED_RETURN: f64 = 12.0;
const DEFAULT_EXPENSE_RATIO: f64 = 0.8;
const DEFAULT_TAXPAYER_AGE: u32 = 30;

/// Currency figures leave the engine unrounded and are rounded here, once.
pub fn round_currency(value: f64) -> i64 {
    value.round() as i64
}

pub fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("{name} is required"))
}

fn ensure_min(name: &str, value: f64, min: f64) -> Result<f64, String> {
    if value.is_nan() || value < min {
        return Err(format!("{name} must be at least {min}"));
    }
    Ok(value)
}

fn ensure_between(name: &str, value: f64, min: f64, max: f64) -> Result<f64, String> {
    if !(min..=max).contains(&value) {
        return Err(format!("{name} must be between {min} and {max}"));
    }
    Ok(value)
}

fn ensure_age_between(name: &str, value: u32, min: u32, max: u32) -> Result<u32, String> {
    if !(min..=max).contains(&value) {
        return Err(format!("{name} must be between {min} and {max}"));
    }
    Ok(value)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmiPayload {
    pub principal: Option<f64>,
    pub rate: Option<f64>,
    pub tenure: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiResponse {
    pub emi: i64,
    pub total_amount: i64,
    pub total_interest: i64,
    pub principal: f64,
    pub rate: f64,
    pub tenure: f64,
}

pub fn loan_terms_from_payload(payload: &EmiPayload) -> Result<LoanTerms, String> {
    let principal = ensure_min("principal", required(payload.principal, "principal")?, 1_000.0)?;
    let rate = ensure_between("rate", required(payload.rate, "rate")?, 0.01, 50.0)?;
    let tenure = ensure_between("tenure", required(payload.tenure, "tenure")?, 1.0, 50.0)?;
    Ok(LoanTerms {
        principal,
        annual_rate_percent: rate,
        tenure_years: tenure,
    })
}

pub fn calculate_emi(payload: &EmiPayload) -> Result<EmiResponse, String> {
    let terms = loan_terms_from_payload(payload)?;
    let result = amortize(&terms).map_err(|e| e.to_string())?;
    Ok(EmiResponse {
        emi: round_currency(result.periodic_payment),
        total_amount: round_currency(result.total_paid),
        total_interest: round_currency(result.total_interest),
        principal: terms.principal,
        rate: terms.annual_rate_percent,
        tenure: terms.tenure_years,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SipPayload {
    pub monthly_investment: Option<f64>,
    pub annual_return: Option<f64>,
    pub tenure: Option<f64>,
    pub step_up_percentage: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipResponse {
    pub maturity_amount: i64,
    pub invested_amount: i64,
    pub returns: i64,
    pub monthly_investment: f64,
    pub annual_return: f64,
    pub tenure: f64,
    pub step_up_percentage: f64,
}

pub fn contribution_plan_from_payload(payload: &SipPayload) -> Result<ContributionPlan, String> {
    let monthly = ensure_min(
        "monthlyInvestment",
        required(payload.monthly_investment, "monthlyInvestment")?,
        500.0,
    )?;
    let annual_return = ensure_between(
        "annualReturn",
        required(payload.annual_return, "annualReturn")?,
        1.0,
        50.0,
    )?;
    let tenure = ensure_between("tenure", required(payload.tenure, "tenure")?, 1.0, 50.0)?;
    let step_up = ensure_between(
        "stepUpPercentage",
        payload.step_up_percentage.unwrap_or(0.0),
        0.0,
        50.0,
    )?;
    Ok(ContributionPlan {
        periodic_contribution: monthly,
        annual_return_percent: annual_return,
        horizon_years: tenure,
        annual_step_up_percent: step_up,
    })
}

pub fn calculate_sip(payload: &SipPayload) -> Result<SipResponse, String> {
    let plan = contribution_plan_from_payload(payload)?;
    let result = project_annuity(&plan).map_err(|e| e.to_string())?;
    Ok(SipResponse {
        maturity_amount: round_currency(result.maturity_value),
        invested_amount: round_currency(result.contributed_principal),
        returns: round_currency(result.gains),
        monthly_investment: plan.periodic_contribution,
        annual_return: plan.annual_return_percent,
        tenure: plan.horizon_years,
        step_up_percentage: plan.annual_step_up_percent,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoalSavingsPayload {
    pub goal_amount: Option<f64>,
    pub time_in_years: Option<f64>,
    pub expected_return: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSavingsResponse {
    pub monthly_investment: i64,
    pub total_investment: i64,
    pub returns: i64,
    pub goal_amount: f64,
    pub time_in_years: f64,
    pub expected_return: f64,
}

pub fn goal_from_payload(payload: &GoalSavingsPayload) -> Result<GoalSpec, String> {
    let goal_amount = ensure_min(
        "goalAmount",
        required(payload.goal_amount, "goalAmount")?,
        10_000.0,
    )?;
    let years = ensure_between(
        "timeInYears",
        required(payload.time_in_years, "timeInYears")?,
        1.0,
        50.0,
    )?;
    let expected_return = ensure_between(
        "expectedReturn",
        required(payload.expected_return, "expectedReturn")?,
        1.0,
        50.0,
    )?;
    Ok(GoalSpec {
        target_value: goal_amount,
        annual_return_percent: expected_return,
        horizon_years: years,
    })
}

pub fn calculate_goal_savings(payload: &GoalSavingsPayload) -> Result<GoalSavingsResponse, String> {
    let goal = goal_from_payload(payload)?;
    let solved = solve_required_contribution(&goal).map_err(|e| e.to_string())?;
    Ok(GoalSavingsResponse {
        monthly_investment: round_currency(solved.periodic_contribution),
        total_investment: round_currency(solved.total_contributed),
        returns: round_currency(solved.projected_surplus_or_deficit),
        goal_amount: goal.target_value,
        time_in_years: goal.horizon_years,
        expected_return: goal.annual_return_percent,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RentVsBuyPayload {
    pub home_price: Option<f64>,
    pub down_payment: Option<f64>,
    pub loan_rate: Option<f64>,
    pub loan_tenure: Option<f64>,
    pub monthly_rent: Option<f64>,
    pub rent_increase: Option<f64>,
    pub time_horizon: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentVsBuyResponse {
    pub total_rent_cost: i64,
    pub total_buy_cost: i64,
    pub recommendation: Recommendation,
    pub savings: i64,
    pub emi: i64,
    pub home_price: f64,
    pub down_payment: f64,
    pub loan_amount: f64,
    pub time_horizon: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct RentVsBuyRequest {
    pub home: HomePurchase,
    pub rent: RentTerms,
    pub horizon_years: u32,
}

pub fn rent_vs_buy_from_payload(payload: &RentVsBuyPayload) -> Result<RentVsBuyRequest, String> {
    let home_price = ensure_min(
        "homePrice",
        required(payload.home_price, "homePrice")?,
        100_000.0,
    )?;
    let down_payment = ensure_min(
        "downPayment",
        required(payload.down_payment, "downPayment")?,
        0.0,
    )?;
    if down_payment > home_price {
        return Err("downPayment cannot exceed homePrice".to_string());
    }
    let loan_rate = ensure_between(
        "loanRate",
        required(payload.loan_rate, "loanRate")?,
        1.0,
        30.0,
    )?;
    let loan_tenure = ensure_between(
        "loanTenure",
        required(payload.loan_tenure, "loanTenure")?,
        5.0,
        30.0,
    )?;
    let monthly_rent = ensure_min(
        "monthlyRent",
        required(payload.monthly_rent, "monthlyRent")?,
        1_000.0,
    )?;
    let rent_increase = ensure_between(
        "rentIncrease",
        required(payload.rent_increase, "rentIncrease")?,
        0.0,
        20.0,
    )?;
    let horizon = ensure_between(
        "timeHorizon",
        required(payload.time_horizon, "timeHorizon")?,
        5.0,
        30.0,
    )?;
    if horizon.fract() != 0.0 {
        return Err("timeHorizon must be a whole number of years".to_string());
    }

    Ok(RentVsBuyRequest {
        home: HomePurchase {
            home_price,
            down_payment,
            loan_rate_percent: loan_rate,
            loan_tenure_years: loan_tenure,
        },
        rent: RentTerms {
            monthly_rent,
            annual_increase_percent: rent_increase,
        },
        horizon_years: horizon as u32,
    })
}

pub fn calculate_rent_vs_buy(payload: &RentVsBuyPayload) -> Result<RentVsBuyResponse, String> {
    let request = rent_vs_buy_from_payload(payload)?;
    let result = compare_rent_vs_buy(&request.home, &request.rent, request.horizon_years)
        .map_err(|e| e.to_string())?;
    Ok(RentVsBuyResponse {
        total_rent_cost: round_currency(result.total_rent_cost),
        total_buy_cost: round_currency(result.total_buy_cost),
        recommendation: result.recommendation,
        savings: round_currency(result.savings),
        emi: round_currency(result.emi),
        home_price: request.home.home_price,
        down_payment: request.home.down_payment,
        loan_amount: result.loan_amount,
        time_horizon: request.horizon_years,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetirementPayload {
    pub current_age: Option<u32>,
    pub retirement_age: Option<u32>,
    pub current_salary: Option<f64>,
    pub current_savings: Option<f64>,
    pub expected_inflation: Option<f64>,
    pub expected_return: Option<f64>,
    pub retirement_expense_ratio: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResponse {
    pub required_corpus: i64,
    pub monthly_investment_needed: i64,
    pub total_investment_needed: i64,
    pub future_value_of_current_savings: i64,
    pub additional_corpus_needed: i64,
    pub monthly_expense_at_retirement: i64,
    pub years_to_retirement: u32,
    pub years_in_retirement: u32,
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_salary: f64,
    pub current_savings: f64,
    pub expected_inflation: f64,
    pub expected_return: f64,
    pub retirement_expense_ratio: f64,
}

pub fn retirement_profile_from_payload(
    payload: &RetirementPayload,
) -> Result<RetirementProfile, String> {
    let current_age = ensure_age_between(
        "currentAge",
        required(payload.current_age, "currentAge")?,
        18,
        65,
    )?;
    let retirement_age = ensure_age_between(
        "retirementAge",
        required(payload.retirement_age, "retirementAge")?,
        50,
        75,
    )?;
    if retirement_age <= current_age {
        return Err("Retirement age must be greater than current age".to_string());
    }
    let salary = ensure_min(
        "currentSalary",
        required(payload.current_salary, "currentSalary")?,
        10_000.0,
    )?;
    let savings = ensure_min("currentSavings", payload.current_savings.unwrap_or(0.0), 0.0)?;
    let inflation = ensure_between(
        "expectedInflation",
        payload.expected_inflation.unwrap_or(DEFAULT_EXPECTED_INFLATION),
        1.0,
        15.0,
    )?;
    let expected_return = ensure_between(
        "expectedReturn",
        payload.expected_return.unwrap_or(DEFAULT_EXPECTED_RETURN),
        5.0,
        20.0,
    )?;
    let expense_ratio = ensure_between(
        "retirementExpenseRatio",
        payload.retirement_expense_ratio.unwrap_or(DEFAULT_EXPENSE_RATIO),
        0.3,
        1.5,
    )?;

    Ok(RetirementProfile {
        current_age,
        retirement_age,
        current_annual_income: salary,
        current_savings: savings,
        inflation_percent: inflation,
        expected_return_percent: expected_return,
        expense_ratio,
    })
}

pub fn calculate_retirement(payload: &RetirementPayload) -> Result<RetirementResponse, String> {
    let profile = retirement_profile_from_payload(payload)?;
    let plan = plan_retirement(&profile).map_err(|e| e.to_string())?;
    Ok(RetirementResponse {
        required_corpus: round_currency(plan.required_corpus),
        monthly_investment_needed: round_currency(plan.monthly_contribution_needed),
        total_investment_needed: round_currency(plan.total_investment_needed),
        future_value_of_current_savings: round_currency(plan.future_value_of_current_savings),
        additional_corpus_needed: round_currency(plan.additional_corpus_needed),
        monthly_expense_at_retirement: round_currency(plan.projected_monthly_expense_at_retirement),
        years_to_retirement: plan.years_to_retirement,
        years_in_retirement: plan.years_in_retirement,
        current_age: profile.current_age,
        retirement_age: profile.retirement_age,
        current_salary: profile.current_annual_income,
        current_savings: profile.current_savings,
        expected_inflation: profile.inflation_percent,
        expected_return: profile.expected_return_percent,
        retirement_expense_ratio: profile.expense_ratio,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaxBenefitPayload {
    pub income: Option<f64>,
    pub tax_regime: Option<TaxRegime>,
    pub age: Option<u32>,
    pub investments: Option<BTreeMap<DeductionSection, f64>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBenefitResponse {
    pub taxable_income: i64,
    pub base_tax: i64,
    pub cess: i64,
    pub total_tax: i64,
    pub tax_savings: i64,
    pub total_deductions: f64,
    pub deduction_breakdown: DeductionBreakdown,
    pub effective_tax_rate: f64,
    pub marginal_tax_rate: f64,
    pub income: f64,
    pub tax_regime: TaxRegime,
    pub age: u32,
}

/// JSON key of a deduction section, as clients send it in `investments`.
fn section_key(section: DeductionSection) -> String {
    match serde_json::to_value(section) {
        Ok(serde_json::Value::String(key)) => key,
        _ => format!("{section:?}"),
    }
}

pub fn tax_profile_from_payload(payload: &TaxBenefitPayload) -> Result<TaxProfile, String> {
    let income = ensure_min("income", required(payload.income, "income")?, 100_000.0)?;
    let regime = required(payload.tax_regime, "taxRegime")?;
    let age = ensure_age_between("age", payload.age.unwrap_or(DEFAULT_TAXPAYER_AGE), 18, 100)?;
    let deductions = payload.investments.clone().unwrap_or_default();
    for (&section, &amount) in &deductions {
        let key = section_key(section);
        if amount.is_nan() || amount < 0.0 {
            return Err(format!("investments.{key} must be >= 0"));
        }
        if !section.applies_at_age(age) {
            return Err(if age < SENIOR_CITIZEN_AGE {
                format!("investments.{key} requires age {SENIOR_CITIZEN_AGE} or above")
            } else {
                format!("investments.{key} is not available from age {SENIOR_CITIZEN_AGE}")
            });
        }
    }
    Ok(TaxProfile {
        gross_income: income,
        regime,
        taxpayer_age: age,
        deductions_by_section: deductions,
    })
}

pub fn calculate_tax_benefit(payload: &TaxBenefitPayload) -> Result<TaxBenefitResponse, String> {
    let profile = tax_profile_from_payload(payload)?;
    let result = compute_tax(&profile).map_err(|e| e.to_string())?;
    Ok(TaxBenefitResponse {
        taxable_income: round_currency(result.taxable_income),
        base_tax: round_currency(result.base_tax),
        cess: round_currency(result.cess),
        total_tax: round_currency(result.total_tax),
        tax_savings: round_currency(result.tax_savings_vs_no_deductions),
        total_deductions: result.total_deductions,
        effective_tax_rate: round_percent(result.effective_rate_percent),
        marginal_tax_rate: marginal_rate_percent(result.taxable_income, profile.regime),
        deduction_breakdown: result.breakdown,
        income: profile.gross_income,
        tax_regime: profile.regime,
        age: profile.taxpayer_age,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSectionInfo {
    pub section: DeductionSection,
    pub max_limit: Option<f64>,
}

/// Deduction sections with their caps, limited to those open to `age` when given.
pub fn tax_sections(age: Option<u32>) -> Result<Vec<TaxSectionInfo>, String> {
    let info = |section: DeductionSection| TaxSectionInfo {
        section,
        max_limit: section.cap(),
    };
    match age {
        Some(age) => {
            let age = ensure_age_between("age", age, 18, 100)?;
            Ok(applicable_sections(age).map(info).collect())
        }
        None => Ok(DeductionSection::ALL.into_iter().map(info).collect()),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElssPayload {
    pub investment: Option<f64>,
    pub income: Option<f64>,
    pub tax_slab: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElssResponse {
    pub tax_saved: i64,
    pub effective_investment: i64,
    pub eligible_deduction: f64,
    pub investment: f64,
    pub tax_slab: f64,
}

/// ELSS savings at an explicit slab rate, or at the legacy regime rate for `income`.
pub fn calculate_elss(payload: &ElssPayload) -> Result<ElssResponse, String> {
    let investment = ensure_min("investment", required(payload.investment, "investment")?, 0.0)?;
    let tax_slab = match (payload.tax_slab, payload.income) {
        (Some(slab), _) => ensure_between("taxSlab", slab, 0.0, 100.0)?,
        (None, Some(income)) => {
            marginal_rate_percent(ensure_min("income", income, 0.0)?, TaxRegime::Legacy)
        }
        (None, None) => return Err("income or taxSlab is required".to_string()),
    };
    let savings = elss_tax_savings(investment, tax_slab).map_err(|e| e.to_string())?;
    Ok(ElssResponse {
        tax_saved: round_currency(savings.tax_saved),
        effective_investment: round_currency(savings.effective_investment),
        eligible_deduction: savings.eligible_deduction,
        investment,
        tax_slab,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LumpSumPayload {
    pub principal: Option<f64>,
    pub annual_return: Option<f64>,
    pub years: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpSumResponse {
    pub maturity_amount: i64,
    pub returns: i64,
    pub principal: f64,
    pub annual_return: f64,
    pub years: f64,
}

pub fn lump_sum_from_payload(payload: &LumpSumPayload) -> Result<LumpSumPlan, String> {
    let principal = required(payload.principal, "principal")?;
    if principal.is_nan() || principal <= 0.0 {
        return Err("principal must be > 0".to_string());
    }
    let annual_return = ensure_between(
        "annualReturn",
        required(payload.annual_return, "annualReturn")?,
        0.0,
        50.0,
    )?;
    let years = ensure_between("years", required(payload.years, "years")?, 1.0, 50.0)?;
    Ok(LumpSumPlan {
        principal,
        annual_return_percent: annual_return,
        horizon_years: years,
    })
}

pub fn calculate_lump_sum(payload: &LumpSumPayload) -> Result<LumpSumResponse, String> {
    let plan = lump_sum_from_payload(payload)?;
    let result = project_lump_sum(&plan).map_err(|e| e.to_string())?;
    Ok(LumpSumResponse {
        maturity_amount: round_currency(result.maturity_value),
        returns: round_currency(result.gains),
        principal: plan.principal,
        annual_return: plan.annual_return_percent,
        years: plan.horizon_years,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllocationPayload {
    pub age: Option<u32>,
    pub risk_appetite: Option<RiskAppetite>,
    pub monthly_expenses: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResponse {
    pub allocation: PortfolioAllocation,
    pub emergency_fund: Option<i64>,
    pub age: u32,
    pub risk_appetite: RiskAppetite,
}

pub fn calculate_allocation(payload: &AllocationPayload) -> Result<AllocationResponse, String> {
    let age = ensure_age_between("age", required(payload.age, "age")?, 18, 100)?;
    let risk_appetite = payload.risk_appetite.unwrap_or(RiskAppetite::Medium);
    let emergency = payload
        .monthly_expenses
        .map(|expenses| emergency_fund(expenses).map(round_currency))
        .transpose()
        .map_err(|e| e.to_string())?;
    Ok(AllocationResponse {
        allocation: optimal_allocation(age, risk_appetite),
        emergency_fund: emergency,
        age,
        risk_appetite,
    })
}
