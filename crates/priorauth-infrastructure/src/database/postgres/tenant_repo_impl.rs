// ============================================================================
// PriorAuth Infrastructure - PostgreSQL Tenant Repository
// File: crates/priorauth-infrastructure/src/database/postgres/tenant_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use priorauth_core::domain::Tenant;
use priorauth_core::error::DomainError;
use priorauth_core::repositories::TenantRepository;

use crate::database::error::{db_error, write_error};

pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantRow {
    id: Uuid,
    name: String,
    slug: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            name: row.name,
            slug: row.slug,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(
            r#"
            SELECT id, name, slug, is_active, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding tenant by id"))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(
            r#"
            SELECT id, name, slug, is_active, created_at, updated_at
            FROM tenants
            WHERE slug = LOWER($1)
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding tenant by slug"))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let row: TenantRow = sqlx::query_as(
            r#"
            INSERT INTO tenants (id, name, slug, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, slug, is_active, created_at, updated_at
            "#,
        )
        .bind(tenant.id)
        .bind(&tenant.name)
        .bind(&tenant.slug)
        .bind(tenant.is_active)
        .bind(tenant.created_at)
        .bind(tenant.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            write_error("creating tenant", e, |constraint| {
                (constraint == "tenants_slug_key")
                    .then(|| DomainError::TenantSlugAlreadyExists(tenant.slug.clone()))
            })
        })?;

        info!(tenant_id = %row.id, slug = %row.slug, "Tenant created");
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    use crate::database::fixtures::seed_tenant;
    use crate::database::Database;

    #[sqlx::test(migrator = "crate::database::MIGRATOR")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_slug_is_unique(pool: PgPool) {
        let db = Database::from_pool(pool);
        let existing = seed_tenant(&db, "clinic-a").await;

        let found = db.tenants().find_by_slug("clinic-a").await.unwrap();
        assert_eq!(found.map(|t| t.id), Some(existing.id));

        let duplicate = Tenant::new("Another Clinic".into(), "Clinic-A".into()).unwrap();
        let err = db.tenants().create(&duplicate).await.unwrap_err();
        assert!(matches!(err, DomainError::TenantSlugAlreadyExists(slug) if slug == "clinic-a"));
    }
}
