//! Tenant scoping.
//!
//! Every filter a repository accepts is wrapped in [`Scoped`], which can only
//! be built through [`scope`]. The tenant field of the wrapped filter is
//! always the tenant the scope was created for, whatever the caller passed.

use std::ops::Deref;

use uuid::Uuid;

use crate::error::DomainError;

/// A query filter that carries a tenant field.
pub trait TenantFilter: Default {
    fn tenant_id(&self) -> Option<Uuid>;
    fn set_tenant_id(&mut self, tenant_id: Uuid);
}

/// A handle that only ever reads and writes one tenant's rows.
pub trait TenantBound {
    fn tenant_id(&self) -> Uuid;

    /// Rejects rows stamped with another tenant before they reach the store.
    fn ensure_owned(&self, row_tenant_id: Uuid, what: &'static str) -> Result<(), DomainError> {
        if row_tenant_id == self.tenant_id() {
            Ok(())
        } else {
            Err(DomainError::CrossTenantReference(what))
        }
    }
}

/// A filter bound to exactly one tenant.
#[derive(Debug, Clone, PartialEq)]
pub struct Scoped<F> {
    tenant_id: Uuid,
    filter: F,
}

impl<F> Scoped<F> {
    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn into_inner(self) -> F {
        self.filter
    }
}

impl<F> Deref for Scoped<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.filter
    }
}

/// Force `tenant_id` onto `filter`, overwriting any caller-supplied tenant.
/// An absent filter scopes the default (match-all) filter.
pub fn scope<F: TenantFilter>(tenant_id: Uuid, filter: Option<F>) -> Scoped<F> {
    let mut filter = filter.unwrap_or_default();
    filter.set_tenant_id(tenant_id);
    Scoped { tenant_id, filter }
}

/// Implements [`TenantFilter`] for structs with a `tenant_id: Option<Uuid>` field.
#[macro_export]
macro_rules! impl_tenant_filter {
    ($($filter:ty),+ $(,)?) => {
        $(
            impl $crate::tenancy::TenantFilter for $filter {
                fn tenant_id(&self) -> Option<::uuid::Uuid> {
                    self.tenant_id
                }

                fn set_tenant_id(&mut self, tenant_id: ::uuid::Uuid) {
                    self.tenant_id = Some(tenant_id);
                }
            }
        )+
    };
}
