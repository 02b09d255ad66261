//! Task repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Task, TaskStatus};
use crate::error::DomainError;
use crate::pagination::PageSource;
use crate::repositories::TaskOrder;
use crate::tenancy::TenantBound;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub tenant_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub status: Option<TaskStatus>,
}

crate::impl_tenant_filter!(TaskFilter);

#[async_trait]
pub trait TaskRepository:
    PageSource<Item = Task, Filter = TaskFilter, Order = TaskOrder> + TenantBound
{
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Task>, DomainError>;
    async fn create(&self, task: &Task) -> Result<Task, DomainError>;
    async fn assign(&self, id: &Uuid, user_id: &Uuid) -> Result<Task, DomainError>;
    async fn update_status(&self, id: &Uuid, status: TaskStatus) -> Result<Task, DomainError>;
}
