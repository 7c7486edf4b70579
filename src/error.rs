//! Calculator error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Missing, non-finite, negative or out-of-range input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot reach target: average profit per sale is {average_profit:.2}")]
    UnreachableTarget { average_profit: f64 },

    #[error("Invalid projection input: {0}")]
    InvalidProjectionInput(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

/// Unwrap an optional numeric input, rejecting missing and non-finite values.
pub(crate) fn require(value: Option<f64>, name: &str) -> CalcResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(CalcError::InvalidInput(format!("{name} is not finite ({v})"))),
        None => Err(CalcError::InvalidInput(format!("{name} is missing"))),
    }
}
