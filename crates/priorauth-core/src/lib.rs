//! # PriorAuth Core
//! 
//! Domain entities, repository traits, and the tenant-scoped data-access
//! primitives (scoping, pagination, transactions, health) for PriorAuth.

pub mod domain;
pub mod repositories;
pub mod tenancy;
pub mod pagination;
pub mod transaction;
pub mod health;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
pub use tenancy::{scope, Scoped, TenantBound, TenantFilter};
pub use pagination::{paginate, ListPages, Page, PageQuery, PageSource};
pub use transaction::{run_in_transaction, TransactionalStore};
pub use health::{check_health, HealthProbe};
