// ============================================================================
// PriorAuth Infrastructure - PostgreSQL User Repository
// File: crates/priorauth-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use priorauth_core::domain::{User, UserRole};
use priorauth_core::error::DomainError;
use priorauth_core::pagination::PageSource;
use priorauth_core::repositories::{SortDirection, UserFilter, UserRepository};
use priorauth_core::tenancy::{Scoped, TenantBound};

use crate::database::error::{db_error, write_error};
use crate::database::query::{count_from, push_order, push_window, select_where};

const USER_COLUMNS: &str = "id, tenant_id, email, name, role, created_at, updated_at";

tenant_repository!(PgUserRepository);

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    tenant_id: Uuid,
    email: String,
    name: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            tenant_id: row.tenant_id,
            email: row.email,
            name: row.name,
            role: UserRole::from_str(&row.role).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PageSource for PgUserRepository {
    type Item = User;
    type Filter = UserFilter;
    type Order = SortDirection;

    async fn find_many(
        &self,
        filter: &Scoped<UserFilter>,
        order: Option<&SortDirection>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, DomainError> {
        let mut qb = select_where(&format!("SELECT {USER_COLUMNS} FROM users"), filter);
        push_order(&mut qb, "created_at", order.copied().unwrap_or_default());
        push_window(&mut qb, offset, limit);

        let rows: Vec<UserRow> = qb
            .build_query_as()
            .fetch_all(self.db.pool())
            .await
            .map_err(db_error("listing users"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &Scoped<UserFilter>) -> Result<u64, DomainError> {
        let mut qb = select_where("SELECT COUNT(*) FROM users", filter);
        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await
            .map_err(db_error("counting users"))?;

        Ok(count_from(total))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(self.tenant_id)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error("finding user by id"))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE tenant_id = $1 AND email = LOWER($2)"
        ))
        .bind(self.tenant_id)
        .bind(email.trim())
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error("finding user by email"))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        self.ensure_owned(user.tenant_id, "user")?;

        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (id, tenant_id, email, name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(self.tenant_id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| {
            write_error("creating user", e, |constraint| {
                (constraint == "users_tenant_email_key")
                    .then(|| DomainError::EmailAlreadyExists(user.email.clone()))
            })
        })?;

        info!(tenant_id = %self.tenant_id, user_id = %row.id, "User created");
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    use crate::database::fixtures::{seed_tenant, seed_user};
    use crate::database::Database;

    #[sqlx::test(migrator = "crate::database::MIGRATOR")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_email_is_unique_per_tenant(pool: PgPool) {
        let db = Database::from_pool(pool);
        let clinic_a = seed_tenant(&db, "clinic-a").await;
        let clinic_b = seed_tenant(&db, "clinic-b").await;
        seed_user(&db, &clinic_a, "front.desk@example.test").await;

        let duplicate =
            User::new(clinic_a.id, "Front.Desk@example.test".into(), None, UserRole::Staff).unwrap();
        let err = db.tenant(clinic_a.id).users().create(&duplicate).await.unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists(email) if email == "front.desk@example.test"));

        seed_user(&db, &clinic_b, "front.desk@example.test").await;
    }
}
