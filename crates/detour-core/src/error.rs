//! Error kinds surfaced by the planner.

use thiserror::Error;

/// Errors raised before any planning work starts.
///
/// Running out of iterations is not an error; see
/// [`PlanStatus::Exhausted`](crate::models::PlanStatus::Exhausted).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// A caller-supplied parameter is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl PlanError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        PlanError::InvalidConfig(message.into())
    }
}

pub type PlanResult<T> = Result<T, PlanError>;

/// Reject values that are NaN, infinite, or not strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> PlanResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlanError::invalid(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}
