//! API error types and responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::pages::PageNotFound;
use crate::segment::MalformedSegment;
use crate::store::PersistenceError;
use crate::validation::{FieldError, ValidationFailure};

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found
    NotFound(String),
    /// Malformed request
    BadRequest(String),
    /// The submitted values do not satisfy the step's rules
    Validation(ValidationFailure),
    /// Internal server error
    InternalError(String),
}

/// One field-level problem
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorResponse {
    pub path: String,
    pub key: String,
    pub message: String,
}

impl From<FieldError> for FieldErrorResponse {
    fn from(e: FieldError) -> Self {
        Self {
            path: e.path,
            key: e.key,
            message: e.message,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorResponse>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, fields) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, Vec::new()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, Vec::new()),
            ApiError::Validation(failure) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                failure.to_string(),
                failure.errors.into_iter().map(FieldErrorResponse::from).collect(),
            ),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg,
                Vec::new(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
                fields,
            }),
        )
            .into_response()
    }
}

impl From<PageNotFound> for ApiError {
    fn from(err: PageNotFound) -> Self {
        ApiError::NotFound(err.to_string())
    }
}

impl From<MalformedSegment> for ApiError {
    fn from(err: MalformedSegment) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ValidationFailure> for ApiError {
    fn from(err: ValidationFailure) -> Self {
        ApiError::Validation(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::InvalidClaimant(_) => ApiError::BadRequest(err.to_string()),
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_not_found_response() {
        let error = ApiError::from(PageNotFound("nope".to_string()));
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.error, "not_found");
        assert!(json.fields.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_segment_is_bad_request() {
        let response = ApiError::from(MalformedSegment("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validation_response_lists_fields() {
        let failure = ValidationFailure {
            errors: vec![FieldError {
                path: "ssn".to_string(),
                key: "validation.required".to_string(),
                message: "This field is required".to_string(),
            }],
        };
        let response = ApiError::from(failure).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.error, "validation_error");
        assert_eq!(json.fields[0].path, "ssn");
    }

    #[tokio::test]
    async fn test_persistence_error_is_internal() {
        let err = PersistenceError::Io {
            action: "write",
            claimant: "c-1".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
