use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use super::payload::{
    AllocationPayload, ElssPayload, EmiPayload, GoalSavingsPayload, LumpSumPayload,
    RentVsBuyPayload, RetirementPayload, SipPayload, TaxBenefitPayload, calculate_allocation,
    calculate_elss, calculate_emi, calculate_goal_savings, calculate_lump_sum,
    calculate_rent_vs_buy, calculate_retirement, calculate_sip, calculate_tax_benefit,
};
use crate::core::{DeductionSection, RiskAppetite, TaxRegime};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTaxRegime {
    #[value(alias = "old-regime")]
    Legacy,
    #[value(alias = "new-regime")]
    Simplified,
}

impl From<CliTaxRegime> for TaxRegime {
    fn from(value: CliTaxRegime) -> Self {
        match value {
            CliTaxRegime::Legacy => TaxRegime::Legacy,
            CliTaxRegime::Simplified => TaxRegime::Simplified,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRiskAppetite {
    Low,
    Medium,
    High,
}

impl From<CliRiskAppetite> for RiskAppetite {
    fn from(value: CliRiskAppetite) -> Self {
        match value {
            CliRiskAppetite::Low => RiskAppetite::Low,
            CliRiskAppetite::Medium => RiskAppetite::Medium,
            CliRiskAppetite::High => RiskAppetite::High,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "taxbae",
    about = "Personal finance calculators: EMI, SIP, goal savings, rent vs buy, retirement and tax"
)]
pub struct Cli {
    #[arg(long, short, global = true, help = "Enable debug logging")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the calculators over HTTP
    Serve(ServeArgs),
    /// Monthly instalment for a loan
    Emi(EmiArgs),
    /// Maturity value of a monthly SIP with optional annual step-up
    Sip(SipArgs),
    /// Monthly investment needed to reach a goal
    Goal(GoalArgs),
    /// Compare renting with buying over a horizon
    RentVsBuy(RentVsBuyArgs),
    /// Corpus and monthly investment needed to retire
    Retirement(RetirementArgs),
    /// Tax liability and deduction savings under either regime
    Tax(TaxArgs),
    /// Tax saved by an ELSS investment under 80C
    Elss(ElssArgs),
    /// Growth of a one-off investment
    LumpSum(LumpSumArgs),
    /// Age and risk based asset allocation
    Allocation(AllocationArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "TAXBAE_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(long, env = "TAXBAE_PORT", default_value_t = 8080)]
    pub port: u16,
}

impl ServeArgs {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Args, Debug)]
pub struct EmiArgs {
    #[arg(long, help = "Loan principal")]
    principal: f64,
    #[arg(long, help = "Annual interest rate in percent, e.g. 8.5")]
    rate: f64,
    #[arg(long, help = "Loan tenure in years")]
    tenure: f64,
}

#[derive(Args, Debug)]
pub struct SipArgs {
    #[arg(long)]
    monthly_investment: f64,
    #[arg(long, help = "Expected annual return in percent")]
    annual_return: f64,
    #[arg(long, help = "Investment period in years")]
    tenure: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual increase of the monthly investment in percent"
    )]
    step_up_percentage: f64,
}

#[derive(Args, Debug)]
pub struct GoalArgs {
    #[arg(long)]
    goal_amount: f64,
    #[arg(long)]
    time_in_years: f64,
    #[arg(long, help = "Expected annual return in percent")]
    expected_return: f64,
}

#[derive(Args, Debug)]
pub struct RentVsBuyArgs {
    #[arg(long)]
    home_price: f64,
    #[arg(long, default_value_t = 0.0)]
    down_payment: f64,
    #[arg(long, help = "Home loan rate in percent")]
    loan_rate: f64,
    #[arg(long, help = "Home loan tenure in years")]
    loan_tenure: f64,
    #[arg(long)]
    monthly_rent: f64,
    #[arg(long, default_value_t = 5.0, help = "Annual rent increase in percent")]
    rent_increase: f64,
    #[arg(long, help = "Comparison horizon in whole years")]
    time_horizon: f64,
}

#[derive(Args, Debug)]
pub struct RetirementArgs {
    #[arg(long)]
    current_age: u32,
    #[arg(long)]
    retirement_age: u32,
    #[arg(long, help = "Current annual salary")]
    current_salary: f64,
    #[arg(long, default_value_t = 0.0)]
    current_savings: f64,
    #[arg(long, help = "Expected annual inflation in percent, defaults to 6")]
    expected_inflation: Option<f64>,
    #[arg(long, help = "Expected annual return in percent, defaults to 12")]
    expected_return: Option<f64>,
    #[arg(
        long,
        help = "Retirement spending as a fraction of current salary, defaults to 0.8"
    )]
    retirement_expense_ratio: Option<f64>,
}

#[derive(Args, Debug)]
pub struct TaxArgs {
    #[arg(long, help = "Gross annual income")]
    income: f64,
    #[arg(long, value_enum, default_value_t = CliTaxRegime::Simplified)]
    regime: CliTaxRegime,
    #[arg(long, help = "Taxpayer age, defaults to 30")]
    age: Option<u32>,
    #[arg(long = "section-80c")]
    section_80c: Option<f64>,
    #[arg(long = "section-80d")]
    section_80d: Option<f64>,
    #[arg(long, help = "NPS contribution under 80CCD(1B)")]
    nps: Option<f64>,
    #[arg(long = "section-80e", help = "Education loan interest")]
    section_80e: Option<f64>,
    #[arg(long = "section-80tta", help = "Savings account interest")]
    section_80tta: Option<f64>,
    #[arg(long = "section-80ttb", help = "Senior citizen deposit interest")]
    section_80ttb: Option<f64>,
    #[arg(long = "section-24", help = "Home loan interest")]
    section_24: Option<f64>,
    #[arg(long = "section-80ee", help = "First-time home buyer interest")]
    section_80ee: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ElssArgs {
    #[arg(long)]
    investment: f64,
    #[arg(long, help = "Gross income, used to pick the slab rate")]
    income: Option<f64>,
    #[arg(long, help = "Slab rate in percent, overrides --income")]
    tax_slab: Option<f64>,
}

#[derive(Args, Debug)]
pub struct LumpSumArgs {
    #[arg(long)]
    principal: f64,
    #[arg(long, help = "Expected annual return in percent")]
    annual_return: f64,
    #[arg(long)]
    years: f64,
}

#[derive(Args, Debug)]
pub struct AllocationArgs {
    #[arg(long)]
    age: u32,
    #[arg(long, value_enum, default_value_t = CliRiskAppetite::Medium)]
    risk_appetite: CliRiskAppetite,
    #[arg(long, help = "Monthly expenses, used to size the emergency fund")]
    monthly_expenses: Option<f64>,
}

impl From<TaxArgs> for TaxBenefitPayload {
    fn from(args: TaxArgs) -> Self {
        let investments: BTreeMap<DeductionSection, f64> = [
            (DeductionSection::Section80C, args.section_80c),
            (DeductionSection::Section80D, args.section_80d),
            (DeductionSection::Nps, args.nps),
            (DeductionSection::Section80E, args.section_80e),
            (DeductionSection::Section80Tta, args.section_80tta),
            (DeductionSection::Section80Ttb, args.section_80ttb),
            (DeductionSection::Section24, args.section_24),
            (DeductionSection::Section80Ee, args.section_80ee),
        ]
        .into_iter()
        .filter_map(|(section, amount)| amount.map(|amount| (section, amount)))
        .collect();

        TaxBenefitPayload {
            income: Some(args.income),
            tax_regime: Some(args.regime.into()),
            age: args.age,
            investments: Some(investments),
        }
    }
}

/// Runs a calculator subcommand and returns its pretty-printed JSON result.
///
/// `serve` is dispatched by the caller since it needs an async runtime.
pub fn run_cli(command: Command) -> Result<String, String> {
    match command {
        Command::Serve(_) => Err("serve must be started from main".to_string()),
        Command::Emi(args) => render(calculate_emi(&EmiPayload {
            principal: Some(args.principal),
            rate: Some(args.rate),
            tenure: Some(args.tenure),
        })),
        Command::Sip(args) => render(calculate_sip(&SipPayload {
            monthly_investment: Some(args.monthly_investment),
            annual_return: Some(args.annual_return),
            tenure: Some(args.tenure),
            step_up_percentage: Some(args.step_up_percentage),
        })),
        Command::Goal(args) => render(calculate_goal_savings(&GoalSavingsPayload {
            goal_amount: Some(args.goal_amount),
            time_in_years: Some(args.time_in_years),
            expected_return: Some(args.expected_return),
        })),
        Command::RentVsBuy(args) => render(calculate_rent_vs_buy(&RentVsBuyPayload {
            home_price: Some(args.home_price),
            down_payment: Some(args.down_payment),
            loan_rate: Some(args.loan_rate),
            loan_tenure: Some(args.loan_tenure),
            monthly_rent: Some(args.monthly_rent),
            rent_increase: Some(args.rent_increase),
            time_horizon: Some(args.time_horizon),
        })),
        Command::Retirement(args) => render(calculate_retirement(&RetirementPayload {
            current_age: Some(args.current_age),
            retirement_age: Some(args.retirement_age),
            current_salary: Some(args.current_salary),
            current_savings: Some(args.current_savings),
            expected_inflation: args.expected_inflation,
            expected_return: args.expected_return,
            retirement_expense_ratio: args.retirement_expense_ratio,
        })),
        Command::Tax(args) => render(calculate_tax_benefit(&args.into())),
        Command::Elss(args) => render(calculate_elss(&ElssPayload {
            investment: Some(args.investment),
            income: args.income,
            tax_slab: args.tax_slab,
        })),
        Command::LumpSum(args) => render(calculate_lump_sum(&LumpSumPayload {
            principal: Some(args.principal),
            annual_return: Some(args.annual_return),
            years: Some(args.years),
        })),
        Command::Allocation(args) => render(calculate_allocation(&AllocationPayload {
            age: Some(args.age),
            risk_appetite: Some(args.risk_appetite.into()),
            monthly_expenses: args.monthly_expenses,
        })),
    }
}

fn render<T: Serialize>(result: Result<T, String>) -> Result<String, String> {
    let data = result?;
    serde_json::to_string_pretty(&data).map_err(|e| format!("Failed to serialize result: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn serve_defaults_to_all_interfaces_on_8080() {
        let cli = parse(&["taxbae", "serve"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        // TAXBAE_PORT/TAXBAE_HOST may be set in the environment running tests.
        if std::env::var_os("TAXBAE_PORT").is_none() && std::env::var_os("TAXBAE_HOST").is_none() {
            assert_eq!(args.socket_addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
        }
    }

    #[test]
    fn emi_subcommand_prints_rounded_json() {
        let cli = parse(&[
            "taxbae", "emi", "--principal", "2500000", "--rate", "8.5", "--tenure", "20",
        ]);
        let output = run_cli(cli.command).expect("calculation should succeed");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["emi"], 21_696);
        assert_eq!(value["totalInterest"], 2_706_939);
    }

    #[test]
    fn tax_subcommand_collects_section_flags() {
        let cli = parse(&[
            "taxbae",
            "tax",
            "--income",
            "1200000",
            "--regime",
            "old-regime",
            "--section-80c",
            "200000",
            "--section-80d",
            "30000",
            "--nps",
            "20000",
        ]);
        let output = run_cli(cli.command).expect("calculation should succeed");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["totalTax"], 107_640);
        assert_eq!(value["deductionBreakdown"]["section80C"], 150_000.0);
        assert_eq!(value["taxRegime"], "OLD_REGIME");
    }

    #[test]
    fn validation_errors_surface_from_subcommands() {
        let cli = parse(&[
            "taxbae",
            "retirement",
            "--current-age",
            "60",
            "--retirement-age",
            "55",
            "--current-salary",
            "900000",
        ]);
        let err = run_cli(cli.command).expect_err("retirement age must exceed current age");
        assert!(err.contains("Retirement age"));
    }

    #[test]
    fn range_errors_name_the_flag_field() {
        let cli = parse(&[
            "taxbae",
            "retirement",
            "--current-age",
            "40",
            "--retirement-age",
            "40",
            "--current-salary",
            "900000",
        ]);
        let err = run_cli(cli.command).expect_err("retirement age below range");
        assert_eq!(err, "retirementAge must be between 50 and 75");
    }

    #[test]
    fn elss_subcommand_derives_slab_from_income() {
        let cli = parse(&[
            "taxbae",
            "elss",
            "--investment",
            "200000",
            "--income",
            "450000",
        ]);
        let output = run_cli(cli.command).expect("calculation should succeed");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["taxSlab"], 5.0);
        assert_eq!(value["taxSaved"], 7_500);
        assert_eq!(value["effectiveInvestment"], 192_500);
    }

    #[test]
    fn tax_subcommand_passes_age_for_senior_sections() {
        let cli = parse(&[
            "taxbae",
            "tax",
            "--income",
            "900000",
            "--regime",
            "legacy",
            "--age",
            "62",
            "--section-80ttb",
            "60000",
        ]);
        let output = run_cli(cli.command).expect("calculation should succeed");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["deductionBreakdown"]["section80TTB"], 50_000.0);
        assert_eq!(value["age"], 62);
    }

    #[test]
    fn verbose_flag_is_global() {
        let cli = parse(&["taxbae", "allocation", "--age", "30", "-v"]);
        assert!(cli.verbose);
    }
}
