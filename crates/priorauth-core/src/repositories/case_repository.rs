//! Case and case code repository traits (ports)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Case, CaseCode, CasePriority, CaseStatus};
use crate::error::DomainError;
use crate::pagination::PageSource;
use crate::repositories::CaseOrder;
use crate::tenancy::TenantBound;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseFilter {
    pub tenant_id: Option<Uuid>,
    pub status: Option<CaseStatus>,
    pub priority: Option<CasePriority>,
    pub created_by: Option<Uuid>,
    pub ingestion_id: Option<Uuid>,
}

crate::impl_tenant_filter!(CaseFilter);

/// Code extracted alongside a new case; ids are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCaseCode {
    pub code: String,
    pub code_type: String,
    pub confidence: Option<f64>,
}

#[async_trait]
pub trait CaseRepository:
    PageSource<Item = Case, Filter = CaseFilter, Order = CaseOrder> + TenantBound
{
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Case>, DomainError>;

    async fn create(&self, case: &Case) -> Result<Case, DomainError>;

    /// Insert the case, its codes, a `case.created` event and an audit record
    /// atomically.
    async fn create_with_codes(
        &self,
        case: &Case,
        codes: Vec<NewCaseCode>,
    ) -> Result<(Case, Vec<CaseCode>), DomainError>;

    /// Change the status and record the transition, atomically.
    async fn update_status(
        &self,
        id: &Uuid,
        status: CaseStatus,
        actor: Option<Uuid>,
    ) -> Result<Case, DomainError>;
}

#[async_trait]
pub trait CaseCodeRepository: TenantBound + Send + Sync {
    async fn add(&self, code: &CaseCode) -> Result<CaseCode, DomainError>;
    async fn list_for_case(&self, case_id: &Uuid) -> Result<Vec<CaseCode>, DomainError>;
}
