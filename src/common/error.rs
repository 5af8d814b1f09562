// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

use super::validation::ValidationResult;
use crate::auth::AuthError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    InternalServer(String),
    ServiceUnavailable(String),
    DatabaseError(sqlx::Error),
    ValidationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Auth(e) => write!(f, "Authentication Error: {}", e),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service Unavailable: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    /// Status code and stable machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Auth(e) => match e {
                AuthError::SigningError(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR")
                }
                AuthError::MissingCredential => (StatusCode::UNAUTHORIZED, "MISSING_CREDENTIAL"),
                AuthError::MalformedCredential => {
                    (StatusCode::UNAUTHORIZED, "MALFORMED_CREDENTIAL")
                }
                AuthError::SignatureInvalid => (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE"),
                AuthError::CredentialExpired => (StatusCode::UNAUTHORIZED, "CREDENTIAL_EXPIRED"),
                AuthError::RefreshMismatch => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                AuthError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            },
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::InternalServer(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR")
            }
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ApiError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            ApiError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = self.status_and_code();
        let error_message = match self {
            ApiError::Auth(e) => {
                if let AuthError::SigningError(detail) = &e {
                    error!(error = %detail, "Credential signing failed");
                } else {
                    warn!(reason = ?e, "Request rejected by authentication");
                }
                e.to_string()
            }
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                "Database operation failed".to_string()
            }
            ApiError::Unauthorized(msg)
            | ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalServer(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::ValidationError(msg) => msg,
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

/// Helper function to convert ValidationResult to ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::ValidationError(error_messages.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_auth_errors_map_to_distinct_codes() {
        let expired = ApiError::from(AuthError::CredentialExpired).status_and_code();
        let forged = ApiError::from(AuthError::SignatureInvalid).status_and_code();

        assert_eq!(expired.0, StatusCode::UNAUTHORIZED);
        assert_eq!(forged.0, StatusCode::UNAUTHORIZED);
        assert_ne!(expired.1, forged.1);
    }

    #[test]
    fn test_forbidden_and_signing_statuses() {
        assert_eq!(
            ApiError::from(AuthError::Forbidden).status_and_code().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(AuthError::SigningError("boom".into()))
                .status_and_code()
                .0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_signing_error_body_does_not_leak_detail() {
        let response =
            ApiError::from(AuthError::SigningError("key material xyz".into())).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(!text.contains("key material xyz"));
        assert!(text.contains("INTERNAL_SERVER_ERROR"));
    }

    #[test]
    fn test_validation_result_conversion() {
        let mut result = ValidationResult::new();
        result.add_error("email", "Email is required");

        match ApiError::from(result) {
            ApiError::ValidationError(msg) => assert_eq!(msg, "email: Email is required"),
            other => panic!("unexpected error: {}", other),
        }
    }
}
