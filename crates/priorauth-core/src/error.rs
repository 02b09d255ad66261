//! Domain errors

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Tenant slug already exists: {0}")]
    TenantSlugAlreadyExists(String),

    #[error("Email already exists in tenant: {0}")]
    EmailAlreadyExists(String),

    #[error("Ingestion not found: {0}")]
    IngestionNotFound(Uuid),

    #[error("Case not found: {0}")]
    CaseNotFound(Uuid),

    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Ruleset not found: {0}")]
    RulesetNotFound(Uuid),

    #[error("Ruleset already exists for payer {payer} and procedure {procedure}")]
    RulesetAlreadyExists { payer: String, procedure: String },

    #[error("Referenced {0} does not belong to this tenant")]
    CrossTenantReference(&'static str),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}
