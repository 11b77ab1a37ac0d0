//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PeriodError;
use domain_fees::FeeError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body failed field validation
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    /// The ledger refused the operation
    #[error("{message}")]
    Rejected {
        code: &'static str,
        message: String,
    },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Validation { message, details } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", message, Some(details))
            }
            ApiError::Rejected { code, message } => (StatusCode::UNPROCESSABLE_ENTITY, code, message, None),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<FeeError> for ApiError {
    fn from(err: FeeError) -> Self {
        match err {
            FeeError::NotApplicable { .. } => ApiError::Rejected {
                code: "not_applicable",
                message: err.to_string(),
            },
            FeeError::InvalidAmount { .. } => ApiError::Rejected {
                code: "invalid_amount",
                message: err.to_string(),
            },
            FeeError::CatalogInconsistent(_) => ApiError::NotFound(err.to_string()),
            FeeError::StoreUnavailable(ref source) => {
                error!(error = %source, transient = source.is_transient(), "Store call failed");
                ApiError::ServiceUnavailable(err.to_string())
            }
            FeeError::Render(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();

        ApiError::Validation {
            message: "Request validation failed".to_string(),
            details,
        }
    }
}

impl From<PeriodError> for ApiError {
    fn from(err: PeriodError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{FeeTypeId, Money, PortError};

    #[test]
    fn test_fee_error_status_mapping() {
        let invalid = ApiError::from(FeeError::InvalidAmount {
            requested: Money::from_major(101),
            full_amount: Money::from_major(100),
        });
        assert_eq!(invalid.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing = ApiError::from(FeeError::CatalogInconsistent(FeeTypeId::new()));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let down = ApiError::from(FeeError::StoreUnavailable(PortError::connection("refused")));
        assert_eq!(down.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
