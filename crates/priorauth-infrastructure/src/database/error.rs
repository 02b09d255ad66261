//! sqlx error translation

use priorauth_core::error::DomainError;
use tracing::{error, warn};

/// Log a store failure and wrap it as `DomainError::DatabaseError`.
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e: sqlx::Error| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

/// Translate a failed write. `known` maps constraints the caller understands;
/// composite tenant foreign keys become `CrossTenantReference`.
pub(crate) fn write_error(
    context: &'static str,
    e: sqlx::Error,
    known: impl FnOnce(&str) -> Option<DomainError>,
) -> DomainError {
    let constraint = e
        .as_database_error()
        .and_then(|db| db.constraint())
        .map(str::to_string);

    if let Some(constraint) = constraint {
        if let Some(mapped) = known(&constraint) {
            warn!("Constraint {} rejected {}", constraint, context);
            return mapped;
        }
        if let Some(target) = foreign_key_target(&constraint) {
            warn!("Foreign key {} rejected {}", constraint, context);
            return DomainError::CrossTenantReference(target);
        }
    }

    db_error(context)(e)
}

/// Entity a composite `(tenant_id, id)` foreign key points at.
fn foreign_key_target(constraint: &str) -> Option<&'static str> {
    match constraint {
        "cases_ingestion_fk" => Some("ingestion"),
        "cases_created_by_fk" | "tasks_assigned_to_fk" | "audit_logs_user_fk" => Some("user"),
        "case_codes_case_fk" | "tasks_case_fk" => Some("case"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_keys_name_their_target() {
        assert_eq!(foreign_key_target("cases_created_by_fk"), Some("user"));
        assert_eq!(foreign_key_target("tasks_case_fk"), Some("case"));
        assert_eq!(foreign_key_target("cases_ingestion_fk"), Some("ingestion"));
        assert_eq!(foreign_key_target("tenants_slug_key"), None);
    }

    #[test]
    fn test_unconstrained_failure_is_database_error() {
        let err = write_error("inserting case", sqlx::Error::RowNotFound, |_| {
            Some(DomainError::TenantSlugAlreadyExists("clinic-a".into()))
        });
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
