// ============================================================================
// PriorAuth Infrastructure - PostgreSQL Task Repository
// File: crates/priorauth-infrastructure/src/database/postgres/task_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use priorauth_core::domain::{Task, TaskStatus};
use priorauth_core::error::DomainError;
use priorauth_core::pagination::PageSource;
use priorauth_core::repositories::{TaskFilter, TaskOrder, TaskRepository, TaskSortField};
use priorauth_core::tenancy::{Scoped, TenantBound};

use crate::database::error::{db_error, write_error};
use crate::database::query::{count_from, push_order, push_window, select_where};

const TASK_COLUMNS: &str = "id, tenant_id, case_id, assigned_to, title, description, status, \
     due_at, created_at, updated_at";

tenant_repository!(PgTaskRepository);

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    tenant_id: Uuid,
    case_id: Uuid,
    assigned_to: Option<Uuid>,
    title: String,
    description: Option<String>,
    status: String,
    due_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            tenant_id: row.tenant_id,
            case_id: row.case_id,
            assigned_to: row.assigned_to,
            title: row.title,
            description: row.description,
            status: TaskStatus::from_str(&row.status).unwrap_or_default(),
            due_at: row.due_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PageSource for PgTaskRepository {
    type Item = Task;
    type Filter = TaskFilter;
    type Order = TaskOrder;

    async fn find_many(
        &self,
        filter: &Scoped<TaskFilter>,
        order: Option<&TaskOrder>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Task>, DomainError> {
        let order = order.copied().unwrap_or(TaskOrder::desc(TaskSortField::CreatedAt));

        let mut qb = select_where(&format!("SELECT {TASK_COLUMNS} FROM tasks"), filter);
        push_order(&mut qb, order.field.column(), order.direction);
        push_window(&mut qb, offset, limit);

        let rows: Vec<TaskRow> = qb
            .build_query_as()
            .fetch_all(self.db.pool())
            .await
            .map_err(db_error("listing tasks"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &Scoped<TaskFilter>) -> Result<u64, DomainError> {
        let mut qb = select_where("SELECT COUNT(*) FROM tasks", filter);
        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await
            .map_err(db_error("counting tasks"))?;

        Ok(count_from(total))
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Task>, DomainError> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(self.tenant_id)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error("finding task by id"))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, task: &Task) -> Result<Task, DomainError> {
        self.ensure_owned(task.tenant_id, "task")?;

        let row: TaskRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO tasks (
                id, tenant_id, case_id, assigned_to, title, description,
                status, due_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.id)
        .bind(self.tenant_id)
        .bind(task.case_id)
        .bind(task.assigned_to)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.due_at)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| write_error("creating task", e, |_| None))?;

        info!(tenant_id = %self.tenant_id, task_id = %row.id, case_id = %row.case_id, "Task created");
        Ok(row.into())
    }

    async fn assign(&self, id: &Uuid, user_id: &Uuid) -> Result<Task, DomainError> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tasks
            SET assigned_to = $3, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(self.tenant_id)
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| write_error("assigning task", e, |_| None))?;

        let row = row.ok_or(DomainError::TaskNotFound(*id))?;
        info!(task_id = %id, assigned_to = %user_id, "Task assigned");
        Ok(row.into())
    }

    async fn update_status(&self, id: &Uuid, status: TaskStatus) -> Result<Task, DomainError> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tasks
            SET status = $3, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(self.tenant_id)
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error("updating task status"))?;

        let row = row.ok_or(DomainError::TaskNotFound(*id))?;
        info!(task_id = %id, status = status.as_str(), "Task status updated");
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use priorauth_core::domain::{Case, CasePriority};
    use priorauth_core::repositories::CaseRepository;
    use sqlx::PgPool;

    use crate::database::fixtures::{count_rows, seed_tenant, seed_user};
    use crate::database::Database;

    #[sqlx::test(migrator = "crate::database::MIGRATOR")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_task_cannot_point_at_another_tenants_rows(pool: PgPool) {
        let db = Database::from_pool(pool);
        let clinic_a = seed_tenant(&db, "clinic-a").await;
        let clinic_b = seed_tenant(&db, "clinic-b").await;
        let lee = seed_user(&db, &clinic_a, "dr.lee@clinic-a.test").await;
        let kim = seed_user(&db, &clinic_b, "dr.kim@clinic-b.test").await;

        let foreign_case = db
            .tenant(clinic_b.id)
            .cases()
            .create(&Case::new(clinic_b.id, kim.id, CasePriority::Normal))
            .await
            .unwrap();
        let tasks = db.tenant(clinic_a.id).tasks();

        let err = tasks
            .create(&Task::new(clinic_a.id, foreign_case.id, "Call payer".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CrossTenantReference("case")));
        assert_eq!(count_rows(&db, "tasks", clinic_a.id).await, 0);

        let own_case = db
            .tenant(clinic_a.id)
            .cases()
            .create(&Case::new(clinic_a.id, lee.id, CasePriority::Normal))
            .await
            .unwrap();
        let task = tasks
            .create(&Task::new(clinic_a.id, own_case.id, "Call payer".into()))
            .await
            .unwrap();

        let err = tasks.assign(&task.id, &kim.id).await.unwrap_err();
        assert!(matches!(err, DomainError::CrossTenantReference("user")));

        let assigned = tasks.assign(&task.id, &lee.id).await.unwrap();
        assert_eq!(assigned.assigned_to, Some(lee.id));
    }
}
