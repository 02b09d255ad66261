// ============================================================================
// PriorAuth Infrastructure - PostgreSQL Ruleset Repository
// File: crates/priorauth-infrastructure/src/database/postgres/ruleset_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use priorauth_core::domain::{Ruleset, RulesContent};
use priorauth_core::error::DomainError;
use priorauth_core::pagination::PageSource;
use priorauth_core::repositories::{RulesetFilter, RulesetRepository, SortDirection};
use priorauth_core::tenancy::{Scoped, TenantBound};
use priorauth_core::transaction::run_in_transaction;

use crate::database::error::{db_error, write_error};
use crate::database::query::{count_from, push_order, push_window, select_where};

const RULESET_COLUMNS: &str =
    "id, tenant_id, payer, procedure, rules, is_active, created_at, updated_at";

tenant_repository!(PgRulesetRepository);

#[derive(Debug, FromRow)]
struct RulesetRow {
    id: Uuid,
    tenant_id: Uuid,
    payer: String,
    procedure: String,
    rules: Json<RulesContent>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RulesetRow> for Ruleset {
    fn from(row: RulesetRow) -> Self {
        Ruleset {
            id: row.id,
            tenant_id: row.tenant_id,
            payer: row.payer,
            procedure: row.procedure,
            rules: row.rules.0,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PageSource for PgRulesetRepository {
    type Item = Ruleset;
    type Filter = RulesetFilter;
    type Order = SortDirection;

    async fn find_many(
        &self,
        filter: &Scoped<RulesetFilter>,
        order: Option<&SortDirection>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Ruleset>, DomainError> {
        let mut qb = select_where(&format!("SELECT {RULESET_COLUMNS} FROM rulesets"), filter);
        push_order(&mut qb, "created_at", order.copied().unwrap_or_default());
        push_window(&mut qb, offset, limit);

        let rows: Vec<RulesetRow> = qb
            .build_query_as()
            .fetch_all(self.db.pool())
            .await
            .map_err(db_error("listing rulesets"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &Scoped<RulesetFilter>) -> Result<u64, DomainError> {
        let mut qb = select_where("SELECT COUNT(*) FROM rulesets", filter);
        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await
            .map_err(db_error("counting rulesets"))?;

        Ok(count_from(total))
    }
}

#[async_trait]
impl RulesetRepository for PgRulesetRepository {
    async fn create(&self, ruleset: &Ruleset) -> Result<Ruleset, DomainError> {
        self.ensure_owned(ruleset.tenant_id, "ruleset")?;

        let row: RulesetRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO rulesets (id, tenant_id, payer, procedure, rules, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RULESET_COLUMNS}
            "#
        ))
        .bind(ruleset.id)
        .bind(self.tenant_id)
        .bind(&ruleset.payer)
        .bind(&ruleset.procedure)
        .bind(Json(&ruleset.rules))
        .bind(ruleset.is_active)
        .bind(ruleset.created_at)
        .bind(ruleset.updated_at)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| {
            write_error("creating ruleset", e, |constraint| {
                (constraint == "rulesets_active_key").then(|| DomainError::RulesetAlreadyExists {
                    payer: ruleset.payer.clone(),
                    procedure: ruleset.procedure.clone(),
                })
            })
        })?;

        info!(
            tenant_id = %self.tenant_id,
            payer = %row.payer,
            procedure = %row.procedure,
            "Ruleset created"
        );
        Ok(row.into())
    }

    async fn find_active(&self, payer: &str, procedure: &str) -> Result<Option<Ruleset>, DomainError> {
        let row: Option<RulesetRow> = sqlx::query_as(&format!(
            r#"
            SELECT {RULESET_COLUMNS}
            FROM rulesets
            WHERE tenant_id = $1 AND payer = $2 AND procedure = $3 AND is_active
            "#
        ))
        .bind(self.tenant_id)
        .bind(payer.trim())
        .bind(procedure.trim())
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error("finding active ruleset"))?;

        Ok(row.map(Into::into))
    }

    /// Activating a ruleset retires whichever version was active for the same
    /// payer and procedure.
    ///
    /// Every version of the key is locked in id order before anything is
    /// written, so concurrent activations of sibling versions queue up
    /// instead of deadlocking.
    async fn set_active(&self, id: &Uuid, is_active: bool) -> Result<Ruleset, DomainError> {
        let tenant_id = self.tenant_id;
        let id = *id;

        let updated = run_in_transaction(&self.db, move |tx| {
            Box::pin(async move {
                // payer and procedure never change, so reading them unlocked is safe
                let key: Option<(String, String)> = sqlx::query_as(
                    "SELECT payer, procedure FROM rulesets WHERE tenant_id = $1 AND id = $2",
                )
                .bind(tenant_id)
                .bind(id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(db_error("reading ruleset key"))?;
                let (payer, procedure) = key.ok_or(DomainError::RulesetNotFound(id))?;

                let _locked: Vec<Uuid> = sqlx::query_scalar(
                    r#"
                    SELECT id FROM rulesets
                    WHERE tenant_id = $1 AND payer = $2 AND procedure = $3
                    ORDER BY id
                    FOR UPDATE
                    "#,
                )
                .bind(tenant_id)
                .bind(&payer)
                .bind(&procedure)
                .fetch_all(&mut **tx)
                .await
                .map_err(db_error("locking ruleset versions"))?;

                if is_active {
                    sqlx::query(
                        r#"
                        UPDATE rulesets
                        SET is_active = FALSE, updated_at = NOW()
                        WHERE tenant_id = $1 AND payer = $2 AND procedure = $3 AND is_active AND id <> $4
                        "#,
                    )
                    .bind(tenant_id)
                    .bind(&payer)
                    .bind(&procedure)
                    .bind(id)
                    .execute(&mut **tx)
                    .await
                    .map_err(db_error("retiring active ruleset"))?;
                }

                let row: RulesetRow = sqlx::query_as(&format!(
                    r#"
                    UPDATE rulesets
                    SET is_active = $3, updated_at = NOW()
                    WHERE tenant_id = $1 AND id = $2
                    RETURNING {RULESET_COLUMNS}
                    "#
                ))
                .bind(tenant_id)
                .bind(id)
                .bind(is_active)
                .fetch_one(&mut **tx)
                .await
                .map_err(db_error("updating ruleset"))?;

                Ok::<_, DomainError>(Ruleset::from(row))
            })
        })
        .await?;

        info!(ruleset_id = %id, is_active, "Ruleset activation changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    use crate::database::fixtures::seed_tenant;
    use crate::database::Database;

    fn mri_rules(turnaround: &str) -> RulesContent {
        RulesContent {
            requirements: vec!["Six weeks of conservative therapy".into()],
            documentation: vec!["Physical therapy notes".into()],
            typical_turnaround: turnaround.into(),
            notes: None,
        }
    }

    fn version(tenant_id: Uuid, is_active: bool) -> Ruleset {
        let mut ruleset =
            Ruleset::new(tenant_id, "Aetna".into(), "MRI Lumbar".into(), mri_rules("5 days")).unwrap();
        ruleset.is_active = is_active;
        ruleset
    }

    async fn active_count(db: &Database, tenant_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM rulesets WHERE tenant_id = $1 AND is_active")
            .bind(tenant_id)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[sqlx::test(migrator = "crate::database::MIGRATOR")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_second_active_version_is_rejected(pool: PgPool) {
        let db = Database::from_pool(pool);
        let tenant = seed_tenant(&db, "clinic-a").await;
        let rulesets = db.tenant(tenant.id).rulesets();

        rulesets.create(&version(tenant.id, true)).await.unwrap();
        let err = rulesets.create(&version(tenant.id, true)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::RulesetAlreadyExists { ref payer, ref procedure }
                if payer == "Aetna" && procedure == "MRI Lumbar"
        ));

        rulesets.create(&version(tenant.id, false)).await.unwrap();
        assert_eq!(active_count(&db, tenant.id).await, 1);
    }

    #[sqlx::test(migrator = "crate::database::MIGRATOR")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_activation_retires_previous_version(pool: PgPool) {
        let db = Database::from_pool(pool);
        let tenant = seed_tenant(&db, "clinic-a").await;
        let rulesets = db.tenant(tenant.id).rulesets();

        let v1 = rulesets.create(&version(tenant.id, true)).await.unwrap();
        let v2 = rulesets.create(&version(tenant.id, false)).await.unwrap();

        let activated = rulesets.set_active(&v2.id, true).await.unwrap();
        assert!(activated.is_active);

        let active = rulesets.find_active(" Aetna ", "MRI Lumbar").await.unwrap();
        assert_eq!(active.map(|r| r.id), Some(v2.id));
        let v1_active: bool = sqlx::query_scalar("SELECT is_active FROM rulesets WHERE id = $1")
            .bind(v1.id)
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert!(!v1_active);

        let retired = rulesets.set_active(&v2.id, false).await.unwrap();
        assert!(!retired.is_active);
        assert!(rulesets.find_active("Aetna", "MRI Lumbar").await.unwrap().is_none());

        let missing = Uuid::new_v4();
        let err = rulesets.set_active(&missing, true).await.unwrap_err();
        assert!(matches!(err, DomainError::RulesetNotFound(id) if id == missing));
    }

    #[sqlx::test(migrator = "crate::database::MIGRATOR")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_concurrent_activations_leave_one_active(pool: PgPool) {
        let db = Database::from_pool(pool);
        let tenant = seed_tenant(&db, "clinic-a").await;
        let rulesets = db.tenant(tenant.id).rulesets();

        rulesets.create(&version(tenant.id, true)).await.unwrap();
        let v2 = rulesets.create(&version(tenant.id, false)).await.unwrap();
        let v3 = rulesets.create(&version(tenant.id, false)).await.unwrap();

        let (first, second) = tokio::join!(
            rulesets.set_active(&v2.id, true),
            rulesets.set_active(&v3.id, true),
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(active_count(&db, tenant.id).await, 1);
    }
}
