//! Seed rows for tests that run against a live database.
//!
//! These tests are ignored by default; run them with `DATABASE_URL` pointing
//! at a scratch Postgres and `cargo test -- --ignored`.

use uuid::Uuid;

use priorauth_core::domain::{Tenant, User, UserRole};
use priorauth_core::repositories::{TenantRepository, UserRepository};

use super::Database;

pub(crate) async fn seed_tenant(db: &Database, slug: &str) -> Tenant {
    let tenant = Tenant::new(format!("Clinic {slug}"), slug.to_string()).unwrap();
    db.tenants().create(&tenant).await.unwrap()
}

pub(crate) async fn seed_user(db: &Database, tenant: &Tenant, email: &str) -> User {
    let user = User::new(tenant.id, email.to_string(), None, UserRole::Clinician).unwrap();
    db.tenant(tenant.id).users().create(&user).await.unwrap()
}

pub(crate) async fn count_rows(db: &Database, table: &str, tenant_id: Uuid) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE tenant_id = $1"))
        .bind(tenant_id)
        .fetch_one(db.pool())
        .await
        .unwrap()
}
