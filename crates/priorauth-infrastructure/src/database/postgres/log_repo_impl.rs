// ============================================================================
// PriorAuth Infrastructure - PostgreSQL Event & Audit Log Repositories
// File: crates/priorauth-infrastructure/src/database/postgres/log_repo_impl.rs
// ============================================================================
//! Append-only. No UPDATE or DELETE statement exists for either table, and
//! the schema triggers reject them anyway.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use priorauth_core::domain::{AuditLog, Event};
use priorauth_core::error::DomainError;
use priorauth_core::pagination::PageSource;
use priorauth_core::repositories::{
    AuditLogFilter, AuditLogRepository, EventFilter, EventRepository, SortDirection,
};
use priorauth_core::tenancy::{Scoped, TenantBound};

use crate::database::error::{db_error, write_error};
use crate::database::query::{count_from, push_order, push_window, select_where};

const EVENT_COLUMNS: &str = "id, tenant_id, event_type, entity_type, entity_id, payload, created_at";
const AUDIT_COLUMNS: &str =
    "id, tenant_id, user_id, action, entity_type, entity_id, details, created_at";

tenant_repository!(PgEventRepository);
tenant_repository!(PgAuditLogRepository);

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    tenant_id: Uuid,
    event_type: String,
    entity_type: String,
    entity_id: Uuid,
    payload: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            tenant_id: row.tenant_id,
            event_type: row.event_type,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            payload: row.payload,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    id: Uuid,
    tenant_id: Uuid,
    user_id: Option<Uuid>,
    action: String,
    entity_type: String,
    entity_id: Uuid,
    details: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl From<AuditLogRow> for AuditLog {
    fn from(row: AuditLogRow) -> Self {
        AuditLog {
            id: row.id,
            tenant_id: row.tenant_id,
            user_id: row.user_id,
            action: row.action,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            details: row.details,
            created_at: row.created_at,
        }
    }
}

/// Shared by the repository and by multi-statement units of work.
pub(crate) async fn insert_event<'e, E: PgExecutor<'e>>(
    executor: E,
    event: &Event,
) -> Result<Event, DomainError> {
    let row: EventRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO events (id, tenant_id, event_type, entity_type, entity_id, payload, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(event.id)
    .bind(event.tenant_id)
    .bind(&event.event_type)
    .bind(&event.entity_type)
    .bind(event.entity_id)
    .bind(&event.payload)
    .bind(event.created_at)
    .fetch_one(executor)
    .await
    .map_err(|e| write_error("appending event", e, |_| None))?;

    Ok(row.into())
}

pub(crate) async fn insert_audit_log<'e, E: PgExecutor<'e>>(
    executor: E,
    entry: &AuditLog,
) -> Result<AuditLog, DomainError> {
    let row: AuditLogRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO audit_logs (id, tenant_id, user_id, action, entity_type, entity_id, details, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {AUDIT_COLUMNS}
        "#
    ))
    .bind(entry.id)
    .bind(entry.tenant_id)
    .bind(entry.user_id)
    .bind(&entry.action)
    .bind(&entry.entity_type)
    .bind(entry.entity_id)
    .bind(&entry.details)
    .bind(entry.created_at)
    .fetch_one(executor)
    .await
    .map_err(|e| write_error("appending audit log", e, |_| None))?;

    Ok(row.into())
}

#[async_trait]
impl PageSource for PgEventRepository {
    type Item = Event;
    type Filter = EventFilter;
    type Order = SortDirection;

    async fn find_many(
        &self,
        filter: &Scoped<EventFilter>,
        order: Option<&SortDirection>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Event>, DomainError> {
        let mut qb = select_where(&format!("SELECT {EVENT_COLUMNS} FROM events"), filter);
        push_order(&mut qb, "created_at", order.copied().unwrap_or_default());
        push_window(&mut qb, offset, limit);

        let rows: Vec<EventRow> = qb
            .build_query_as()
            .fetch_all(self.db.pool())
            .await
            .map_err(db_error("listing events"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &Scoped<EventFilter>) -> Result<u64, DomainError> {
        let mut qb = select_where("SELECT COUNT(*) FROM events", filter);
        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await
            .map_err(db_error("counting events"))?;

        Ok(count_from(total))
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn append(&self, event: &Event) -> Result<Event, DomainError> {
        self.ensure_owned(event.tenant_id, "event")?;
        insert_event(self.db.pool(), event).await
    }
}

#[async_trait]
impl PageSource for PgAuditLogRepository {
    type Item = AuditLog;
    type Filter = AuditLogFilter;
    type Order = SortDirection;

    async fn find_many(
        &self,
        filter: &Scoped<AuditLogFilter>,
        order: Option<&SortDirection>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<AuditLog>, DomainError> {
        let mut qb = select_where(&format!("SELECT {AUDIT_COLUMNS} FROM audit_logs"), filter);
        push_order(&mut qb, "created_at", order.copied().unwrap_or_default());
        push_window(&mut qb, offset, limit);

        let rows: Vec<AuditLogRow> = qb
            .build_query_as()
            .fetch_all(self.db.pool())
            .await
            .map_err(db_error("listing audit logs"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &Scoped<AuditLogFilter>) -> Result<u64, DomainError> {
        let mut qb = select_where("SELECT COUNT(*) FROM audit_logs", filter);
        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await
            .map_err(db_error("counting audit logs"))?;

        Ok(count_from(total))
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    async fn append(&self, entry: &AuditLog) -> Result<AuditLog, DomainError> {
        self.ensure_owned(entry.tenant_id, "audit log")?;
        insert_audit_log(self.db.pool(), entry).await
    }
}
