//! Repository traits (ports) and their query filters
//!
//! Implementations are bound to one tenant; filters passed to them are
//! re-scoped to that tenant before any query is built.

pub mod ordering;
pub mod tenant_repository;
pub mod user_repository;
pub mod ingestion_repository;
pub mod case_repository;
pub mod task_repository;
pub mod ruleset_repository;
pub mod log_repository;

pub use ordering::{CaseOrder, CaseSortField, OrderBy, SortDirection, TaskOrder, TaskSortField};
pub use tenant_repository::TenantRepository;
pub use user_repository::{UserFilter, UserRepository};
pub use ingestion_repository::{IngestionFilter, IngestionRepository};
pub use case_repository::{CaseCodeRepository, CaseFilter, CaseRepository, NewCaseCode};
pub use task_repository::{TaskFilter, TaskRepository};
pub use ruleset_repository::{RulesetFilter, RulesetRepository};
pub use log_repository::{AuditLogFilter, AuditLogRepository, EventFilter, EventRepository};
