//! Tenant-bound database handle

use uuid::Uuid;

use priorauth_core::tenancy::TenantBound;

use super::connection::Database;
use super::postgres::{
    PgAuditLogRepository, PgCaseCodeRepository, PgCaseRepository, PgEventRepository,
    PgIngestionRepository, PgRulesetRepository, PgTaskRepository, PgUserRepository,
};

/// Obtained from [`Database::tenant`]. Every repository handed out here binds
/// this tenant on each statement it runs.
#[derive(Clone)]
pub struct TenantDb {
    db: Database,
    tenant_id: Uuid,
}

impl TenantDb {
    pub(crate) fn new(db: Database, tenant_id: Uuid) -> Self {
        Self { db, tenant_id }
    }

    pub fn users(&self) -> PgUserRepository {
        PgUserRepository::new(self.db.clone(), self.tenant_id)
    }

    pub fn ingestions(&self) -> PgIngestionRepository {
        PgIngestionRepository::new(self.db.clone(), self.tenant_id)
    }

    pub fn cases(&self) -> PgCaseRepository {
        PgCaseRepository::new(self.db.clone(), self.tenant_id)
    }

    pub fn case_codes(&self) -> PgCaseCodeRepository {
        PgCaseCodeRepository::new(self.db.clone(), self.tenant_id)
    }

    pub fn tasks(&self) -> PgTaskRepository {
        PgTaskRepository::new(self.db.clone(), self.tenant_id)
    }

    pub fn rulesets(&self) -> PgRulesetRepository {
        PgRulesetRepository::new(self.db.clone(), self.tenant_id)
    }

    pub fn events(&self) -> PgEventRepository {
        PgEventRepository::new(self.db.clone(), self.tenant_id)
    }

    pub fn audit_logs(&self) -> PgAuditLogRepository {
        PgAuditLogRepository::new(self.db.clone(), self.tenant_id)
    }
}

impl TenantBound for TenantDb {
    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }
}
