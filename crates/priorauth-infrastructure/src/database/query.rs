//! Dynamic list/count SQL for scoped filters.
//!
//! Every statement starts with `WHERE tenant_id = $1`, taken from the
//! [`Scoped`] wrapper rather than from the filter itself.

use sqlx::{Postgres, QueryBuilder};

use priorauth_core::repositories::{
    AuditLogFilter, CaseFilter, EventFilter, IngestionFilter, RulesetFilter, SortDirection,
    TaskFilter, UserFilter,
};
use priorauth_core::tenancy::Scoped;

pub(crate) type PgQuery = QueryBuilder<'static, Postgres>;

/// Appends `AND column = $n` for every field the filter sets.
pub(crate) trait SqlFilter {
    fn push_predicates(&self, qb: &mut PgQuery);
}

/// `"{select} WHERE tenant_id = $1"` plus the filter's own predicates.
pub(crate) fn select_where<F: SqlFilter>(select: &str, filter: &Scoped<F>) -> PgQuery {
    let mut qb = QueryBuilder::new(select);
    qb.push(" WHERE tenant_id = ").push_bind(filter.tenant_id());
    filter.filter().push_predicates(&mut qb);
    qb
}

/// Order by `column`, breaking ties on `id` so pages never overlap.
pub(crate) fn push_order(qb: &mut PgQuery, column: &'static str, direction: SortDirection) {
    let direction = direction.as_sql();
    qb.push(" ORDER BY ")
        .push(column)
        .push(" ")
        .push(direction)
        .push(", id ")
        .push(direction);
}

pub(crate) fn push_window(qb: &mut PgQuery, offset: u64, limit: u64) {
    qb.push(" LIMIT ")
        .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .push(" OFFSET ")
        .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));
}

/// Negative counts cannot happen; treat them as empty.
pub(crate) fn count_from(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or_default()
}

fn push_eq<T>(qb: &mut PgQuery, column: &str, value: Option<T>)
where
    T: 'static + Send + sqlx::Encode<'static, Postgres> + sqlx::Type<Postgres>,
{
    if let Some(value) = value {
        qb.push(" AND ").push(column).push(" = ").push_bind(value);
    }
}

impl SqlFilter for UserFilter {
    fn push_predicates(&self, qb: &mut PgQuery) {
        push_eq(qb, "role", self.role.map(|r| r.as_str()));
    }
}

impl SqlFilter for IngestionFilter {
    fn push_predicates(&self, qb: &mut PgQuery) {
        push_eq(qb, "status", self.status.map(|s| s.as_str()));
    }
}

impl SqlFilter for CaseFilter {
    fn push_predicates(&self, qb: &mut PgQuery) {
        push_eq(qb, "status", self.status.map(|s| s.as_str()));
        push_eq(qb, "priority", self.priority.map(|p| p.as_str()));
        push_eq(qb, "created_by", self.created_by);
        push_eq(qb, "ingestion_id", self.ingestion_id);
    }
}

impl SqlFilter for TaskFilter {
    fn push_predicates(&self, qb: &mut PgQuery) {
        push_eq(qb, "case_id", self.case_id);
        push_eq(qb, "assigned_to", self.assigned_to);
        push_eq(qb, "status", self.status.map(|s| s.as_str()));
    }
}

impl SqlFilter for RulesetFilter {
    fn push_predicates(&self, qb: &mut PgQuery) {
        push_eq(qb, "payer", self.payer.clone());
        push_eq(qb, "procedure", self.procedure.clone());
        push_eq(qb, "is_active", self.is_active);
    }
}

impl SqlFilter for EventFilter {
    fn push_predicates(&self, qb: &mut PgQuery) {
        push_eq(qb, "event_type", self.event_type.clone());
        push_eq(qb, "entity_type", self.entity_type.clone());
        push_eq(qb, "entity_id", self.entity_id);
    }
}

impl SqlFilter for AuditLogFilter {
    fn push_predicates(&self, qb: &mut PgQuery) {
        push_eq(qb, "user_id", self.user_id);
        push_eq(qb, "action", self.action.clone());
        push_eq(qb, "entity_type", self.entity_type.clone());
        push_eq(qb, "entity_id", self.entity_id);
    }
}
