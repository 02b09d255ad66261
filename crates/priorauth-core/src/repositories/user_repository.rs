//! User repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{User, UserRole};
use crate::error::DomainError;
use crate::pagination::PageSource;
use crate::repositories::SortDirection;
use crate::tenancy::TenantBound;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub tenant_id: Option<Uuid>,
    pub role: Option<UserRole>,
}

crate::impl_tenant_filter!(UserFilter);

#[async_trait]
pub trait UserRepository:
    PageSource<Item = User, Filter = UserFilter, Order = SortDirection> + TenantBound
{
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn create(&self, user: &User) -> Result<User, DomainError>;
}
