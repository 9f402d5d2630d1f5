use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use super::CREATE_LOAN_PLAN_PATH;
use crate::errors::LoanError;

/// Message clients get for any failure that is not their fault.
const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Error envelope of every failed request, `{"error": {"message": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Opaque, human readable description of the failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Failures of the loan plan endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("method {0} is not allowed")]
    MethodNotAllowed(Method),

    #[error("can't parse request body as JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("can't parse {field:?} from request: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    Loan(#[from] LoanError),
}

impl ApiError {
    pub(crate) fn invalid_field(field: &'static str, err: impl std::fmt::Display) -> Self {
        ApiError::InvalidField {
            field,
            message: err.to_string(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidBody(_) | Self::InvalidField { .. } => StatusCode::BAD_REQUEST,
            Self::Loan(err) if err.is_invalid_parameter() => StatusCode::BAD_REQUEST,
            Self::Loan(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // only client errors carry details; they never expose internal state
        let message = if status.is_server_error() {
            error!(path = CREATE_LOAN_PLAN_PATH, error = %self, "internal server error");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            warn!(path = CREATE_LOAN_PLAN_PATH, status = status.as_u16(), error = %self, "bad request");
            self.to_string()
        };

        let body = ErrorResponse {
            error: ErrorBody { message },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MethodNotAllowed(Method::GET).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::invalid_field("loanAmount", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LoanError::invalid("startDate", "2020-12-30", "too late")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LoanError::calculation("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_field_error_names_field() {
        let err = ApiError::invalid_field("nominalRate", "Invalid decimal: empty");
        assert_eq!(
            err.to_string(),
            "can't parse \"nominalRate\" from request: Invalid decimal: empty"
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = ErrorResponse {
            error: ErrorBody {
                message: "nope".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":{"message":"nope"}}"#
        );
    }
}
