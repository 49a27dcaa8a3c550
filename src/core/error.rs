use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl CalcError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type CalcResult<T> = Result<T, CalcError>;

pub(crate) fn require_finite(field: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, "must be a finite number"))
    }
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> CalcResult<f64> {
    let value = require_finite(field, value)?;
    if value <= 0.0 {
        return Err(CalcError::invalid(field, "must be > 0"));
    }
    Ok(value)
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> CalcResult<f64> {
    let value = require_finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::invalid(field, "must be >= 0"));
    }
    Ok(value)
}

/// Converts a duration in years to monthly periods, `years * 12`.
///
/// The count is not rounded: a 2.3 year tenure is 27.6 periods.
pub(crate) fn periods_in(field: &'static str, years: f64) -> CalcResult<f64> {
    let months = require_finite(field, years)? * 12.0;
    if months < 1.0 {
        return Err(CalcError::invalid(field, "must cover at least one month"));
    }
    Ok(months)
}
