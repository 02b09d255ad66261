// ============================================================================
// PriorAuth Infrastructure - Connection Manager
// File: crates/priorauth-infrastructure/src/database/connection.rs
// ============================================================================
//! One pooled database handle, built at startup and passed to whoever needs it.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use priorauth_core::error::DomainError;
use priorauth_core::health::{check_health, HealthProbe};
use priorauth_core::transaction::TransactionalStore;
use priorauth_shared::config::DatabaseSettings;
use priorauth_shared::constants::HEALTH_CHECK_QUERY;

use super::error::db_error;
use super::postgres::PgTenantRepository;
use super::tenant_db::TenantDb;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Cloning shares the underlying pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    fn pool_options(settings: &DatabaseSettings) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_seconds))
    }

    /// Connect over the pooled URL and verify the pool with one round trip.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        let pool = Self::pool_options(settings).connect(&settings.url).await?;
        sqlx::query(HEALTH_CHECK_QUERY).execute(&pool).await?;

        info!(
            max_connections = settings.max_connections,
            "Database pool established"
        );
        Ok(Self { pool })
    }

    /// Build the pool without opening a connection.
    pub fn connect_lazy(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        let pool = Self::pool_options(settings).connect_lazy(&settings.url)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Tenants are looked up before any tenant-bound handle exists.
    pub fn tenants(&self) -> PgTenantRepository {
        PgTenantRepository::new(self.pool.clone())
    }

    /// Handle whose repositories only touch `tenant_id`'s rows.
    pub fn tenant(&self, tenant_id: Uuid) -> TenantDb {
        TenantDb::new(self.clone(), tenant_id)
    }

    pub async fn health_check(&self) -> bool {
        check_health(self).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TransactionalStore for Database {
    type Tx = Transaction<'static, Postgres>;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        self.pool.begin().await.map_err(db_error("beginning transaction"))
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), DomainError> {
        tx.commit().await.map_err(db_error("committing transaction"))
    }

    async fn rollback(&self, tx: Self::Tx) -> Result<(), DomainError> {
        tx.rollback().await.map_err(db_error("rolling back transaction"))
    }
}

#[async_trait]
impl HealthProbe for Database {
    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query(HEALTH_CHECK_QUERY)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::DatabaseError(e.to_string()))
    }
}

/// Apply pending migrations over the direct (non-pooled) connection.
pub async fn run_migrations(settings: &DatabaseSettings) -> Result<(), sqlx::migrate::MigrateError> {
    let mut conn = PgConnection::connect(settings.migration_url()).await?;
    MIGRATOR.run(&mut conn).await?;
    conn.close().await?;

    info!("Database migrations applied");
    Ok(())
}
