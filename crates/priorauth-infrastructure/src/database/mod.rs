//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod tenant_db;
pub mod postgres;
mod error;
mod query;
#[cfg(test)]
pub(crate) mod fixtures;

pub use connection::{run_migrations, Database, MIGRATOR};
pub use tenant_db::TenantDb;
