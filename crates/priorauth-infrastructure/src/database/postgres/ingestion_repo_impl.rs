// ============================================================================
// PriorAuth Infrastructure - PostgreSQL Ingestion Repository
// File: crates/priorauth-infrastructure/src/database/postgres/ingestion_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use priorauth_core::domain::{Ingestion, IngestionStatus, SourceMetadata};
use priorauth_core::error::DomainError;
use priorauth_core::pagination::PageSource;
use priorauth_core::repositories::{IngestionFilter, IngestionRepository, SortDirection};
use priorauth_core::tenancy::{Scoped, TenantBound};

use crate::database::error::{db_error, write_error};
use crate::database::query::{count_from, push_order, push_window, select_where};

const INGESTION_COLUMNS: &str =
    "id, tenant_id, status, source, error_message, created_at, updated_at";

tenant_repository!(PgIngestionRepository);

#[derive(Debug, FromRow)]
struct IngestionRow {
    id: Uuid,
    tenant_id: Uuid,
    status: String,
    source: Option<Json<SourceMetadata>>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<IngestionRow> for Ingestion {
    fn from(row: IngestionRow) -> Self {
        Ingestion {
            id: row.id,
            tenant_id: row.tenant_id,
            status: IngestionStatus::from_str(&row.status).unwrap_or_default(),
            source: row.source.map(|Json(source)| source),
            error_message: row.error_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PageSource for PgIngestionRepository {
    type Item = Ingestion;
    type Filter = IngestionFilter;
    type Order = SortDirection;

    async fn find_many(
        &self,
        filter: &Scoped<IngestionFilter>,
        order: Option<&SortDirection>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Ingestion>, DomainError> {
        let mut qb = select_where(&format!("SELECT {INGESTION_COLUMNS} FROM ingestions"), filter);
        push_order(&mut qb, "created_at", order.copied().unwrap_or_default());
        push_window(&mut qb, offset, limit);

        let rows: Vec<IngestionRow> = qb
            .build_query_as()
            .fetch_all(self.db.pool())
            .await
            .map_err(db_error("listing ingestions"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &Scoped<IngestionFilter>) -> Result<u64, DomainError> {
        let mut qb = select_where("SELECT COUNT(*) FROM ingestions", filter);
        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await
            .map_err(db_error("counting ingestions"))?;

        Ok(count_from(total))
    }
}

#[async_trait]
impl IngestionRepository for PgIngestionRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Ingestion>, DomainError> {
        let row: Option<IngestionRow> = sqlx::query_as(&format!(
            "SELECT {INGESTION_COLUMNS} FROM ingestions WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(self.tenant_id)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error("finding ingestion by id"))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, ingestion: &Ingestion) -> Result<Ingestion, DomainError> {
        self.ensure_owned(ingestion.tenant_id, "ingestion")?;

        let row: IngestionRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO ingestions (id, tenant_id, status, source, error_message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {INGESTION_COLUMNS}
            "#
        ))
        .bind(ingestion.id)
        .bind(self.tenant_id)
        .bind(ingestion.status.as_str())
        .bind(ingestion.source.as_ref().map(Json))
        .bind(&ingestion.error_message)
        .bind(ingestion.created_at)
        .bind(ingestion.updated_at)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| write_error("creating ingestion", e, |_| None))?;

        info!(
            tenant_id = %self.tenant_id,
            ingestion_id = %row.id,
            source = ingestion.source.as_ref().map(|s| s.kind()).unwrap_or("none"),
            "Ingestion created"
        );
        Ok(row.into())
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: IngestionStatus,
        error_message: Option<String>,
    ) -> Result<Ingestion, DomainError> {
        let row: Option<IngestionRow> = sqlx::query_as(&format!(
            r#"
            UPDATE ingestions
            SET status = $3, error_message = $4, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {INGESTION_COLUMNS}
            "#
        ))
        .bind(self.tenant_id)
        .bind(id)
        .bind(status.as_str())
        .bind(error_message)
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error("updating ingestion status"))?;

        let row = row.ok_or(DomainError::IngestionNotFound(*id))?;
        info!(ingestion_id = %id, status = status.as_str(), "Ingestion status updated");
        Ok(row.into())
    }
}
