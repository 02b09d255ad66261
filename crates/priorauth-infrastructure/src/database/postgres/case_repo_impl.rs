// ============================================================================
// PriorAuth Infrastructure - PostgreSQL Case Repository
// File: crates/priorauth-infrastructure/src/database/postgres/case_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::types::Json;
use sqlx::{FromRow, PgExecutor};
use tracing::info;
use uuid::Uuid;

use priorauth_core::domain::{
    AuditLog, Case, CaseCode, CasePriority, CaseStatus, ConfidenceRecord, Event,
};
use priorauth_core::error::DomainError;
use priorauth_core::pagination::PageSource;
use priorauth_core::repositories::{
    CaseCodeRepository, CaseFilter, CaseOrder, CaseRepository, CaseSortField, NewCaseCode,
};
use priorauth_core::tenancy::{Scoped, TenantBound};
use priorauth_core::transaction::run_in_transaction;

use super::{insert_audit_log, insert_event};
use crate::database::error::{db_error, write_error};
use crate::database::query::{count_from, push_order, push_window, select_where};

const CASE_COLUMNS: &str = "id, tenant_id, ingestion_id, created_by, member_id_hash, payer, \
     status, priority, extracted_data, confidence, created_at, updated_at";
const CASE_CODE_COLUMNS: &str = "id, tenant_id, case_id, code, code_type, confidence, created_at";

tenant_repository!(PgCaseRepository);
tenant_repository!(PgCaseCodeRepository);

#[derive(Debug, FromRow)]
struct CaseRow {
    id: Uuid,
    tenant_id: Uuid,
    ingestion_id: Option<Uuid>,
    created_by: Uuid,
    member_id_hash: Option<String>,
    payer: Option<String>,
    status: String,
    priority: String,
    extracted_data: serde_json::Value,
    confidence: Option<Json<ConfidenceRecord>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CaseRow> for Case {
    fn from(row: CaseRow) -> Self {
        Case {
            id: row.id,
            tenant_id: row.tenant_id,
            ingestion_id: row.ingestion_id,
            created_by: row.created_by,
            member_id_hash: row.member_id_hash,
            payer: row.payer,
            status: CaseStatus::from_str(&row.status).unwrap_or_default(),
            priority: CasePriority::from_str(&row.priority).unwrap_or_default(),
            extracted_data: row.extracted_data,
            confidence: row.confidence.map(|Json(c)| c),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CaseCodeRow {
    id: Uuid,
    tenant_id: Uuid,
    case_id: Uuid,
    code: String,
    code_type: String,
    confidence: Option<f64>,
    created_at: DateTime<Utc>,
}

impl From<CaseCodeRow> for CaseCode {
    fn from(row: CaseCodeRow) -> Self {
        CaseCode {
            id: row.id,
            tenant_id: row.tenant_id,
            case_id: row.case_id,
            code: row.code,
            code_type: row.code_type,
            confidence: row.confidence,
            created_at: row.created_at,
        }
    }
}

async fn insert_case<'e, E: PgExecutor<'e>>(executor: E, case: &Case) -> Result<Case, DomainError> {
    let row: CaseRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO cases (
            id, tenant_id, ingestion_id, created_by, member_id_hash, payer,
            status, priority, extracted_data, confidence, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {CASE_COLUMNS}
        "#
    ))
    .bind(case.id)
    .bind(case.tenant_id)
    .bind(case.ingestion_id)
    .bind(case.created_by)
    .bind(&case.member_id_hash)
    .bind(&case.payer)
    .bind(case.status.as_str())
    .bind(case.priority.as_str())
    .bind(&case.extracted_data)
    .bind(case.confidence.as_ref().map(Json))
    .bind(case.created_at)
    .bind(case.updated_at)
    .fetch_one(executor)
    .await
    .map_err(|e| write_error("creating case", e, |_| None))?;

    Ok(row.into())
}

async fn insert_case_code<'e, E: PgExecutor<'e>>(
    executor: E,
    code: &CaseCode,
) -> Result<CaseCode, DomainError> {
    let row: CaseCodeRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO case_codes (id, tenant_id, case_id, code, code_type, confidence, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {CASE_CODE_COLUMNS}
        "#
    ))
    .bind(code.id)
    .bind(code.tenant_id)
    .bind(code.case_id)
    .bind(&code.code)
    .bind(&code.code_type)
    .bind(code.confidence)
    .bind(code.created_at)
    .fetch_one(executor)
    .await
    .map_err(|e| write_error("adding case code", e, |_| None))?;

    Ok(row.into())
}

#[async_trait]
impl PageSource for PgCaseRepository {
    type Item = Case;
    type Filter = CaseFilter;
    type Order = CaseOrder;

    async fn find_many(
        &self,
        filter: &Scoped<CaseFilter>,
        order: Option<&CaseOrder>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Case>, DomainError> {
        let order = order.copied().unwrap_or(CaseOrder::desc(CaseSortField::CreatedAt));

        let mut qb = select_where(&format!("SELECT {CASE_COLUMNS} FROM cases"), filter);
        push_order(&mut qb, order.field.column(), order.direction);
        push_window(&mut qb, offset, limit);

        let rows: Vec<CaseRow> = qb
            .build_query_as()
            .fetch_all(self.db.pool())
            .await
            .map_err(db_error("listing cases"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &Scoped<CaseFilter>) -> Result<u64, DomainError> {
        let mut qb = select_where("SELECT COUNT(*) FROM cases", filter);
        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await
            .map_err(db_error("counting cases"))?;

        Ok(count_from(total))
    }
}

#[async_trait]
impl CaseRepository for PgCaseRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Case>, DomainError> {
        let row: Option<CaseRow> = sqlx::query_as(&format!(
            "SELECT {CASE_COLUMNS} FROM cases WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(self.tenant_id)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error("finding case by id"))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, case: &Case) -> Result<Case, DomainError> {
        self.ensure_owned(case.tenant_id, "case")?;
        case.validate()?;

        let created = insert_case(self.db.pool(), case).await?;
        info!(tenant_id = %self.tenant_id, case_id = %created.id, "Case created");
        Ok(created)
    }

    async fn create_with_codes(
        &self,
        case: &Case,
        codes: Vec<NewCaseCode>,
    ) -> Result<(Case, Vec<CaseCode>), DomainError> {
        self.ensure_owned(case.tenant_id, "case")?;
        case.validate()?;

        let tenant_id = self.tenant_id;
        let case = case.clone();
        let codes = codes
            .into_iter()
            .map(|c| CaseCode::new(tenant_id, case.id, c.code, c.code_type, c.confidence))
            .collect::<Result<Vec<_>, _>>()?;

        let (created, inserted) = run_in_transaction(&self.db, move |tx| {
            Box::pin(async move {
                let created = insert_case(&mut **tx, &case).await?;

                let mut inserted = Vec::with_capacity(codes.len());
                for code in &codes {
                    inserted.push(insert_case_code(&mut **tx, code).await?);
                }

                let event = Event::new(
                    tenant_id,
                    "case.created",
                    "case",
                    created.id,
                    json!({
                        "priority": created.priority.as_str(),
                        "codes": inserted.iter().map(|c| c.code.as_str()).collect::<Vec<_>>(),
                    }),
                );
                insert_event(&mut **tx, &event).await?;

                let audit = AuditLog::new(
                    tenant_id,
                    Some(created.created_by),
                    "create",
                    "case",
                    created.id,
                    json!({ "ingestion_id": created.ingestion_id }),
                );
                insert_audit_log(&mut **tx, &audit).await?;

                Ok::<_, DomainError>((created, inserted))
            })
        })
        .await?;

        info!(
            tenant_id = %tenant_id,
            case_id = %created.id,
            codes = inserted.len(),
            "Case created with codes"
        );
        Ok((created, inserted))
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: CaseStatus,
        actor: Option<Uuid>,
    ) -> Result<Case, DomainError> {
        let tenant_id = self.tenant_id;
        let id = *id;

        let updated = run_in_transaction(&self.db, move |tx| {
            Box::pin(async move {
                let previous: Option<String> = sqlx::query_scalar(
                    "SELECT status FROM cases WHERE tenant_id = $1 AND id = $2 FOR UPDATE",
                )
                .bind(tenant_id)
                .bind(id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(db_error("locking case"))?;
                let previous = previous.ok_or(DomainError::CaseNotFound(id))?;

                let row: CaseRow = sqlx::query_as(&format!(
                    r#"
                    UPDATE cases
                    SET status = $3, updated_at = NOW()
                    WHERE tenant_id = $1 AND id = $2
                    RETURNING {CASE_COLUMNS}
                    "#
                ))
                .bind(tenant_id)
                .bind(id)
                .bind(status.as_str())
                .fetch_one(&mut **tx)
                .await
                .map_err(db_error("updating case status"))?;

                let transition = json!({ "from": previous, "to": status.as_str() });

                let event = Event::new(
                    tenant_id,
                    "case.status_changed",
                    "case",
                    id,
                    transition.clone(),
                );
                insert_event(&mut **tx, &event).await?;

                let audit = AuditLog::new(tenant_id, actor, "update_status", "case", id, transition);
                insert_audit_log(&mut **tx, &audit).await?;

                Ok::<_, DomainError>(Case::from(row))
            })
        })
        .await?;

        info!(case_id = %id, status = status.as_str(), "Case status updated");
        Ok(updated)
    }
}

#[async_trait]
impl CaseCodeRepository for PgCaseCodeRepository {
    async fn add(&self, code: &CaseCode) -> Result<CaseCode, DomainError> {
        self.ensure_owned(code.tenant_id, "case code")?;
        insert_case_code(self.db.pool(), code).await
    }

    async fn list_for_case(&self, case_id: &Uuid) -> Result<Vec<CaseCode>, DomainError> {
        let rows: Vec<CaseCodeRow> = sqlx::query_as(&format!(
            r#"
            SELECT {CASE_CODE_COLUMNS}
            FROM case_codes
            WHERE tenant_id = $1 AND case_id = $2
            ORDER BY created_at, id
            "#
        ))
        .bind(self.tenant_id)
        .bind(case_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(db_error("listing case codes"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
