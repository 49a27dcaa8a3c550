use std::collections::BTreeMap;

use super::error::{CalcError, CalcResult, require_non_negative};
use super::types::{
    DeductionBreakdown, DeductionSection, ElssSavings, TaxProfile, TaxRegime, TaxResult,
};

pub const STANDARD_DEDUCTION_CAP: f64 = 50_000.0;
pub const CESS_RATE: f64 = 0.04;
/// Age from which 80TTB replaces 80TTA for interest income.
pub const SENIOR_CITIZEN_AGE: u32 = 60;

/// Sections always reported in a legacy regime breakdown, zero when unclaimed.
const REPORTED_SECTIONS: [DeductionSection; 2] =
    [DeductionSection::Section80C, DeductionSection::Section80D];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBand {
    pub lower: f64,
    pub upper: f64,
    pub rate: f64,
}

const fn band(lower: f64, upper: f64, rate: f64) -> TaxBand {
    TaxBand { lower, upper, rate }
}

const LEGACY_BANDS: [TaxBand; 4] = [
    band(0.0, 250_000.0, 0.0),
    band(250_000.0, 500_000.0, 0.05),
    band(500_000.0, 1_000_000.0, 0.20),
    band(1_000_000.0, f64::INFINITY, 0.30),
];

const SIMPLIFIED_BANDS: [TaxBand; 6] = [
    band(0.0, 300_000.0, 0.0),
    band(300_000.0, 600_000.0, 0.05),
    band(600_000.0, 900_000.0, 0.10),
    band(900_000.0, 1_200_000.0, 0.15),
    band(1_200_000.0, 1_500_000.0, 0.20),
    band(1_500_000.0, f64::INFINITY, 0.30),
];

pub fn bands(regime: TaxRegime) -> &'static [TaxBand] {
    match regime {
        TaxRegime::Legacy => &LEGACY_BANDS,
        TaxRegime::Simplified => &SIMPLIFIED_BANDS,
    }
}

impl DeductionSection {
    pub const ALL: [DeductionSection; 8] = [
        DeductionSection::Section80C,
        DeductionSection::Section80D,
        DeductionSection::Nps,
        DeductionSection::Section80E,
        DeductionSection::Section80Tta,
        DeductionSection::Section80Ttb,
        DeductionSection::Section24,
        DeductionSection::Section80Ee,
    ];

    /// Statutory ceiling for a claim; `None` means the section is uncapped.
    pub fn cap(self) -> Option<f64> {
        match self {
            DeductionSection::Section80C => Some(150_000.0),
            DeductionSection::Section80D => Some(25_000.0),
            DeductionSection::Nps => Some(50_000.0),
            DeductionSection::Section80E => None,
            DeductionSection::Section80Tta => Some(10_000.0),
            DeductionSection::Section80Ttb => Some(50_000.0),
            DeductionSection::Section24 => Some(200_000.0),
            DeductionSection::Section80Ee => Some(50_000.0),
        }
    }

    pub fn clamp_claim(self, claimed: f64) -> f64 {
        let claimed = if claimed.is_finite() { claimed.max(0.0) } else { 0.0 };
        match self.cap() {
            Some(cap) => claimed.min(cap),
            None => claimed,
        }
    }

    /// Whether a taxpayer of `age` may claim the section at all.
    pub fn applies_at_age(self, age: u32) -> bool {
        match self {
            DeductionSection::Section80Tta => age < SENIOR_CITIZEN_AGE,
            DeductionSection::Section80Ttb => age >= SENIOR_CITIZEN_AGE,
            _ => true,
        }
    }
}

pub fn applicable_sections(age: u32) -> impl Iterator<Item = DeductionSection> {
    DeductionSection::ALL
        .into_iter()
        .filter(move |section| section.applies_at_age(age))
}

pub fn compute_tax(profile: &TaxProfile) -> CalcResult<TaxResult> {
    let income = require_non_negative("gross_income", profile.gross_income)?;

    let age = profile.taxpayer_age;

    let breakdown =
        aggregate_deductions(income, profile.regime, age, &profile.deductions_by_section);
    let assessed = assess(income, profile.regime, &breakdown);
    let baseline = assess(
        income,
        profile.regime,
        &aggregate_deductions(income, profile.regime, age, &BTreeMap::new()),
    );

    let effective_rate_percent = if income > 0.0 {
        assessed.total_tax / income * 100.0
    } else {
        0.0
    };

    Ok(TaxResult {
        taxable_income: assessed.taxable_income,
        base_tax: assessed.base_tax,
        cess: assessed.cess,
        total_tax: assessed.total_tax,
        total_deductions: assessed.total_deductions,
        effective_rate_percent,
        tax_savings_vs_no_deductions: baseline.total_tax - assessed.total_tax,
        breakdown,
    })
}

/// Tax an ELSS investment saves through 80C at the given slab rate.
pub fn elss_tax_savings(investment: f64, slab_rate_percent: f64) -> CalcResult<ElssSavings> {
    let investment = require_non_negative("investment", investment)?;
    let slab = require_non_negative("slab_rate_percent", slab_rate_percent)?;
    if slab > 100.0 {
        return Err(CalcError::invalid("slab_rate_percent", "must be <= 100"));
    }

    let eligible_deduction = DeductionSection::Section80C.clamp_claim(investment);
    let tax_saved = eligible_deduction * slab / 100.0;
    Ok(ElssSavings {
        eligible_deduction,
        tax_saved,
        effective_investment: investment - tax_saved,
    })
}

/// Tax owed on `taxable_income` before cess.
pub fn slab_tax(taxable_income: f64, regime: TaxRegime) -> f64 {
    bands(regime)
        .iter()
        .filter(|band| taxable_income > band.lower)
        .map(|band| (taxable_income.min(band.upper) - band.lower) * band.rate)
        .sum()
}

/// Rate, in percent, of the band `taxable_income` falls into.
pub fn marginal_rate_percent(taxable_income: f64, regime: TaxRegime) -> f64 {
    bands(regime)
        .iter()
        .rev()
        .find(|band| taxable_income > band.lower)
        .map_or(0.0, |band| band.rate * 100.0)
}

fn aggregate_deductions(
    income: f64,
    regime: TaxRegime,
    age: u32,
    claims: &BTreeMap<DeductionSection, f64>,
) -> DeductionBreakdown {
    let mut breakdown = DeductionBreakdown {
        standard_deduction: STANDARD_DEDUCTION_CAP.min(income),
        sections: BTreeMap::new(),
    };
    if regime == TaxRegime::Legacy {
        breakdown.sections.extend(REPORTED_SECTIONS.map(|section| (section, 0.0)));
        for (&section, &claimed) in claims {
            if section.applies_at_age(age) {
                breakdown.sections.insert(section, section.clamp_claim(claimed));
            }
        }
    }
    breakdown
}

#[derive(Debug, Clone, Copy)]
struct Assessment {
    taxable_income: f64,
    total_deductions: f64,
    base_tax: f64,
    cess: f64,
    total_tax: f64,
}

fn assess(income: f64, regime: TaxRegime, breakdown: &DeductionBreakdown) -> Assessment {
    let total_deductions = breakdown.standard_deduction + breakdown.sections.values().sum::<f64>();
    let taxable_income = (income - total_deductions).max(0.0);
    let base_tax = slab_tax(taxable_income, regime);
    let cess = base_tax * CESS_RATE;
    Assessment {
        taxable_income,
        total_deductions,
        base_tax,
        cess,
        total_tax: base_tax + cess,
    }
}
