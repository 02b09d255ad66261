// ============================================================================
// PriorAuth API - Error Mapping
// File: crates/priorauth-api/src/error.rs
// ============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use priorauth_core::error::DomainError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::IngestionNotFound(_)
            | DomainError::CaseNotFound(_)
            | DomainError::TaskNotFound(_)
            | DomainError::RulesetNotFound(_) => ApiError::NotFound(message),
            DomainError::TenantSlugAlreadyExists(_)
            | DomainError::EmailAlreadyExists(_)
            | DomainError::RulesetAlreadyExists { .. } => ApiError::Conflict(message),
            DomainError::CrossTenantReference(_)
            | DomainError::InvalidPagination(_)
            | DomainError::ValidationError(_) => ApiError::BadRequest(message),
            DomainError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, "CONFLICT", msg)
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                // Store messages stay in the log
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", "Database error".to_string())
            }
        };

        (status, Json(ApiResponse::failure(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_domain_errors_map_to_status() {
        let cases = [
            (DomainError::CaseNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (DomainError::EmailAlreadyExists("a@b.co".into()), StatusCode::CONFLICT),
            (DomainError::InvalidPagination("page".into()), StatusCode::BAD_REQUEST),
            (DomainError::CrossTenantReference("user"), StatusCode::BAD_REQUEST),
            (DomainError::DatabaseError("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
