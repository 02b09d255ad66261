//! # PriorAuth Core - Domain Module
//! 
//! Entities of the prior authorization workflow. Every row except `Tenant`
//! carries the `tenant_id` that partitions it.

pub mod tenant;
pub mod user;
pub mod ingestion;
pub mod case;
pub mod case_code;
pub mod task;
pub mod ruleset;
pub mod event;
pub mod audit_log;

// Re-export all entities and enums
pub use tenant::Tenant;
pub use user::{User, UserRole};
pub use ingestion::{Ingestion, IngestionStatus, SourceMetadata, EmailSource, PdfSource};
pub use case::{Case, CaseStatus, CasePriority, ConfidenceRecord, hash_member_id};
pub use case_code::CaseCode;
pub use task::{Task, TaskStatus};
pub use ruleset::{Ruleset, RulesContent};
pub use event::Event;
pub use audit_log::AuditLog;
