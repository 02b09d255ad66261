//! PostgreSQL repository implementations

/// Declares a repository bound to one tenant.
macro_rules! tenant_repository {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            db: $crate::database::Database,
            tenant_id: ::uuid::Uuid,
        }

        impl $name {
            pub(crate) fn new(db: $crate::database::Database, tenant_id: ::uuid::Uuid) -> Self {
                Self { db, tenant_id }
            }
        }

        impl ::priorauth_core::tenancy::TenantBound for $name {
            fn tenant_id(&self) -> ::uuid::Uuid {
                self.tenant_id
            }
        }
    };
}

mod tenant_repo_impl;
mod user_repo_impl;
mod ingestion_repo_impl;
mod case_repo_impl;
mod task_repo_impl;
mod ruleset_repo_impl;
mod log_repo_impl;

pub use tenant_repo_impl::PgTenantRepository;
pub use user_repo_impl::PgUserRepository;
pub use ingestion_repo_impl::PgIngestionRepository;
pub use case_repo_impl::{PgCaseCodeRepository, PgCaseRepository};
pub use task_repo_impl::PgTaskRepository;
pub use ruleset_repo_impl::PgRulesetRepository;
pub use log_repo_impl::{PgAuditLogRepository, PgEventRepository};

pub(crate) use log_repo_impl::{insert_audit_log, insert_event};
