//! Ruleset repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::Ruleset;
use crate::error::DomainError;
use crate::pagination::PageSource;
use crate::repositories::SortDirection;
use crate::tenancy::TenantBound;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulesetFilter {
    pub tenant_id: Option<Uuid>,
    pub payer: Option<String>,
    pub procedure: Option<String>,
    pub is_active: Option<bool>,
}

crate::impl_tenant_filter!(RulesetFilter);

#[async_trait]
pub trait RulesetRepository:
    PageSource<Item = Ruleset, Filter = RulesetFilter, Order = SortDirection> + TenantBound
{
    async fn create(&self, ruleset: &Ruleset) -> Result<Ruleset, DomainError>;
    async fn find_active(&self, payer: &str, procedure: &str) -> Result<Option<Ruleset>, DomainError>;
    async fn set_active(&self, id: &Uuid, is_active: bool) -> Result<Ruleset, DomainError>;
}
