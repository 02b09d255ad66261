//! # PriorAuth Infrastructure
//! 
//! PostgreSQL implementations (adapters) of the core ports.

pub mod database;

pub use database::{run_migrations, Database, TenantDb};
pub use database::postgres::{
    PgAuditLogRepository, PgCaseCodeRepository, PgCaseRepository, PgEventRepository,
    PgIngestionRepository, PgRulesetRepository, PgTaskRepository, PgTenantRepository,
    PgUserRepository,
};
