use thiserror::Error;

/// Engine failures. Only invalid inputs can fail; degenerate ratios are
/// reported as `0.0` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    #[error("Invalid input `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl ValuationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValuationError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            ValuationError::InvalidInput { field, .. } => field,
        }
    }
}
