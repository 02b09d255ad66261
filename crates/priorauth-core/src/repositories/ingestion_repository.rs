//! Ingestion repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Ingestion, IngestionStatus};
use crate::error::DomainError;
use crate::pagination::PageSource;
use crate::repositories::SortDirection;
use crate::tenancy::TenantBound;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionFilter {
    pub tenant_id: Option<Uuid>,
    pub status: Option<IngestionStatus>,
}

crate::impl_tenant_filter!(IngestionFilter);

#[async_trait]
pub trait IngestionRepository:
    PageSource<Item = Ingestion, Filter = IngestionFilter, Order = SortDirection> + TenantBound
{
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Ingestion>, DomainError>;
    async fn create(&self, ingestion: &Ingestion) -> Result<Ingestion, DomainError>;
    async fn update_status(
        &self,
        id: &Uuid,
        status: IngestionStatus,
        error_message: Option<String>,
    ) -> Result<Ingestion, DomainError>;
}
