use crate::engine::ValuationError;

/// Application-level error carrying the process exit code.
///
/// Exit codes: `2` invalid input or file problems, `3` no usable rows,
/// `4` runtime/terminal failures.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ValuationError> for AppError {
    fn from(err: ValuationError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valuation_errors_map_to_input_exit_code() {
        let err: AppError = ValuationError::InvalidInput {
            field: "purchase_price",
            reason: "must be greater than zero".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("purchase_price"));
    }
}
