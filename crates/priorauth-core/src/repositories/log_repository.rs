//! Append-only event and audit log traits (ports)
//!
//! Neither trait offers update or delete.

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{AuditLog, Event};
use crate::error::DomainError;
use crate::pagination::PageSource;
use crate::repositories::SortDirection;
use crate::tenancy::TenantBound;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub tenant_id: Option<Uuid>,
    pub event_type: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogFilter {
    pub tenant_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
}

crate::impl_tenant_filter!(EventFilter, AuditLogFilter);

#[async_trait]
pub trait EventRepository:
    PageSource<Item = Event, Filter = EventFilter, Order = SortDirection> + TenantBound
{
    async fn append(&self, event: &Event) -> Result<Event, DomainError>;
}

#[async_trait]
pub trait AuditLogRepository:
    PageSource<Item = AuditLog, Filter = AuditLogFilter, Order = SortDirection> + TenantBound
{
    async fn append(&self, entry: &AuditLog) -> Result<AuditLog, DomainError>;
}
