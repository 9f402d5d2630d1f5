use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoanError {
    /// an input failed its range check; safe to show to end users
    #[error("invalid parameter {parameter}: {reason}, got {value}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("calculation error: {message}")]
    Calculation {
        message: String,
    },
}

impl LoanError {
    pub(crate) fn invalid(parameter: &'static str, value: impl ToString, reason: &'static str) -> Self {
        LoanError::InvalidParameter {
            parameter,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn calculation(message: impl Into<String>) -> Self {
        LoanError::Calculation {
            message: message.into(),
        }
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, LoanError::InvalidParameter { .. })
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
