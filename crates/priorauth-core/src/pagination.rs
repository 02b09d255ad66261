// ============================================================================
// PriorAuth Core - Pagination
// File: crates/priorauth-core/src/pagination.rs
// Description: Page-of-results helper over any tenant-scoped page source
// ============================================================================

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use priorauth_shared::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use priorauth_shared::PageRequest;

use crate::error::DomainError;
use crate::tenancy::{scope, Scoped, TenantBound, TenantFilter};

/// A store that can list and count rows matching a scoped filter.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;
    type Filter: TenantFilter + Send + Sync;
    type Order: Send + Sync;

    async fn find_many(
        &self,
        filter: &Scoped<Self::Filter>,
        order: Option<&Self::Order>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self::Item>, DomainError>;

    async fn count(&self, filter: &Scoped<Self::Filter>) -> Result<u64, DomainError>;
}

/// Paginated listing for tenant-bound page sources.
#[async_trait]
pub trait ListPages: PageSource + TenantBound {
    async fn list(
        &self,
        query: PageQuery<Self::Filter, Self::Order>,
    ) -> Result<Page<Self::Item>, DomainError> {
        paginate(self, self.tenant_id(), query).await
    }
}

impl<T: PageSource + TenantBound + ?Sized> ListPages for T {}

/// Filter, ordering and 1-indexed page position for a list request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery<F, O> {
    pub filter: Option<F>,
    pub order: Option<O>,
    pub page: u32,
    pub page_size: u32,
}

impl<F, O> Default for PageQuery<F, O> {
    fn default() -> Self {
        Self {
            filter: None,
            order: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<F, O> PageQuery<F, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order(mut self, order: O) -> Self {
        self.order = Some(order);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn request(self, request: PageRequest) -> Self {
        self.page(request.page).page_size(request.page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

/// Validated offset/limit for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Rejects `page < 1` and `page_size < 1`. Any other window is honoured as asked.
    pub fn resolve(page: u32, page_size: u32) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::InvalidPagination("page must be at least 1".into()));
        }
        if page_size < 1 {
            return Err(DomainError::InvalidPagination("page_size must be at least 1".into()));
        }

        Ok(Self {
            page,
            page_size,
            offset: u64::from(page - 1) * u64::from(page_size),
            limit: u64::from(page_size),
        })
    }
}

/// `ceil(total / page_size)`; zero rows means zero pages.
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    let page_size = u64::from(page_size.max(1));
    total.div_ceil(page_size)
}

/// Fetch one page for `tenant_id`. The row query and the count query run
/// concurrently and are not read from a shared snapshot.
pub async fn paginate<S>(
    source: &S,
    tenant_id: Uuid,
    query: PageQuery<S::Filter, S::Order>,
) -> Result<Page<S::Item>, DomainError>
where
    S: PageSource + ?Sized,
{
    let window = PageWindow::resolve(query.page, query.page_size)?;
    let filter = scope(tenant_id, query.filter);

    let (data, total) = tokio::try_join!(
        source.find_many(&filter, query.order.as_ref(), window.offset, window.limit),
        source.count(&filter),
    )?;

    debug!(
        tenant_id = %tenant_id,
        page = window.page,
        page_size = window.page_size,
        rows = data.len(),
        total,
        "Fetched page"
    );

    Ok(Page {
        data,
        total,
        page: window.page,
        page_size: window.page_size,
        total_pages: total_pages(total, window.page_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::sync::Barrier;

    use crate::domain::{Case, CasePriority, CaseStatus};
    use crate::repositories::{CaseFilter, CaseOrder};

    struct MemoryCases {
        rows: Vec<Case>,
        last_window: Mutex<Option<(u64, u64)>>,
    }

    impl MemoryCases {
        fn new(rows: Vec<Case>) -> Self {
            Self { rows, last_window: Mutex::new(None) }
        }

        fn matching<'a>(&'a self, filter: &'a Scoped<CaseFilter>) -> impl Iterator<Item = &'a Case> + 'a {
            self.rows.iter().filter(move |c| {
                c.tenant_id == filter.tenant_id()
                    && filter.status.map_or(true, |s| c.status == s)
                    && filter.priority.map_or(true, |p| c.priority == p)
            })
        }
    }

    #[async_trait]
    impl PageSource for MemoryCases {
        type Item = Case;
        type Filter = CaseFilter;
        type Order = CaseOrder;

        async fn find_many(
            &self,
            filter: &Scoped<CaseFilter>,
            _order: Option<&CaseOrder>,
            offset: u64,
            limit: u64,
        ) -> Result<Vec<Case>, DomainError> {
            *self.last_window.lock().unwrap() = Some((offset, limit));
            Ok(self
                .matching(filter)
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn count(&self, filter: &Scoped<CaseFilter>) -> Result<u64, DomainError> {
            Ok(self.matching(filter).count() as u64)
        }
    }

    fn cases(tenant_id: Uuid, status: CaseStatus, n: usize) -> Vec<Case> {
        (0..n)
            .map(|_| {
                let mut case = Case::new(tenant_id, Uuid::new_v4(), CasePriority::Normal);
                case.set_status(status);
                case
            })
            .collect()
    }

    fn clinic_fixture(clinic_a: Uuid) -> MemoryCases {
        let mut rows = cases(clinic_a, CaseStatus::Pending, 45);
        rows.extend(cases(clinic_a, CaseStatus::Approved, 7));
        rows.extend(cases(Uuid::new_v4(), CaseStatus::Pending, 30));
        MemoryCases::new(rows)
    }

    fn pending() -> CaseFilter {
        CaseFilter { status: Some(CaseStatus::Pending), ..Default::default() }
    }

    #[tokio::test]
    async fn test_first_page_of_pending_cases() {
        let clinic_a = Uuid::new_v4();
        let source = clinic_fixture(clinic_a);

        let page = paginate(&source, clinic_a, PageQuery::new().filter(pending()))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 20);
        assert_eq!(page.total, 45);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 20);
        assert_eq!(page.total_pages, 3);
        assert!(page.data.iter().all(|c| c.tenant_id == clinic_a && c.status == CaseStatus::Pending));
    }

    #[tokio::test]
    async fn test_last_partial_page() {
        let clinic_a = Uuid::new_v4();
        let source = clinic_fixture(clinic_a);

        let page = paginate(&source, clinic_a, PageQuery::new().filter(pending()).page(3).page_size(20))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 5);
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages, 3);
        assert_eq!(*source.last_window.lock().unwrap(), Some((40, 20)));
    }

    #[tokio::test]
    async fn test_offset_and_page_bounds_hold_for_many_sizes() {
        let clinic_a = Uuid::new_v4();
        let source = clinic_fixture(clinic_a);

        for page_size in [1u32, 3, 7, 20, 45, 50] {
            for page in 1u32..=6 {
                let result = paginate(
                    &source,
                    clinic_a,
                    PageQuery::new().filter(pending()).page(page).page_size(page_size),
                )
                .await
                .unwrap();

                let expected_offset = u64::from(page - 1) * u64::from(page_size);
                assert_eq!(*source.last_window.lock().unwrap(), Some((expected_offset, u64::from(page_size))));
                assert!(result.data.len() <= page_size as usize);
                assert_eq!(result.total, 45);
                assert_eq!(result.total_pages, (45 + u64::from(page_size) - 1) / u64::from(page_size));
            }
        }
    }

    #[tokio::test]
    async fn test_page_beyond_end_is_empty_but_counts() {
        let clinic_a = Uuid::new_v4();
        let source = clinic_fixture(clinic_a);

        let page = paginate(&source, clinic_a, PageQuery::new().filter(pending()).page(9))
            .await
            .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 45);
    }

    #[tokio::test]
    async fn test_caller_tenant_is_ignored() {
        let clinic_a = Uuid::new_v4();
        let source = clinic_fixture(clinic_a);
        let foreign = CaseFilter { tenant_id: Some(Uuid::new_v4()), ..pending() };

        let page = paginate(&source, clinic_a, PageQuery::new().filter(foreign)).await.unwrap();
        assert_eq!(page.total, 45);
    }

    #[tokio::test]
    async fn test_empty_result_has_zero_pages() {
        let source = MemoryCases::new(Vec::new());
        let page: Page<Case> = paginate(&source, Uuid::new_v4(), PageQuery::new()).await.unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_invalid_window_rejected_before_querying() {
        let source = MemoryCases::new(Vec::new());

        let zero_page = paginate(&source, Uuid::new_v4(), PageQuery::<CaseFilter, CaseOrder>::new().page(0)).await;
        assert!(matches!(zero_page, Err(DomainError::InvalidPagination(_))));

        let zero_size = paginate(&source, Uuid::new_v4(), PageQuery::<CaseFilter, CaseOrder>::new().page_size(0)).await;
        assert!(matches!(zero_size, Err(DomainError::InvalidPagination(_))));

        assert!(source.last_window.lock().unwrap().is_none());
    }

    #[test]
    fn test_large_page_size_is_honoured() {
        let window = PageWindow::resolve(2, 500).unwrap();
        assert_eq!(window.page_size, 500);
        assert_eq!(window.offset, 500);
        assert_eq!(window.limit, 500);
    }

    #[tokio::test]
    async fn test_second_page_of_oversized_window_is_empty() {
        let clinic_a = Uuid::new_v4();
        let source = MemoryCases::new(cases(clinic_a, CaseStatus::Pending, 450));

        let page = paginate(&source, clinic_a, PageQuery::new().page(2).page_size(500))
            .await
            .unwrap();

        assert_eq!(page.total, 450);
        assert!(page.data.is_empty());
        assert_eq!(page.page_size, 500);
        assert_eq!(page.total_pages, 1);
        assert_eq!(*source.last_window.lock().unwrap(), Some((500, 500)));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(45, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(0, 20), 0);
    }

    /// Both queries must be in flight at once, otherwise the barrier never opens.
    struct RendezvousSource {
        barrier: Barrier,
    }

    #[async_trait]
    impl PageSource for RendezvousSource {
        type Item = Case;
        type Filter = CaseFilter;
        type Order = CaseOrder;

        async fn find_many(
            &self,
            _filter: &Scoped<CaseFilter>,
            _order: Option<&CaseOrder>,
            _offset: u64,
            _limit: u64,
        ) -> Result<Vec<Case>, DomainError> {
            self.barrier.wait().await;
            Ok(Vec::new())
        }

        async fn count(&self, _filter: &Scoped<CaseFilter>) -> Result<u64, DomainError> {
            self.barrier.wait().await;
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_rows_and_count_are_fetched_concurrently() {
        let source = RendezvousSource { barrier: Barrier::new(2) };
        let result = tokio::time::timeout(
            Duration::from_secs(2),
            paginate(&source, Uuid::new_v4(), PageQuery::new()),
        )
        .await;

        assert!(result.is_ok(), "find_many and count were not issued concurrently");
    }

    struct FailingCount;

    #[async_trait]
    impl PageSource for FailingCount {
        type Item = Case;
        type Filter = CaseFilter;
        type Order = CaseOrder;

        async fn find_many(
            &self,
            _filter: &Scoped<CaseFilter>,
            _order: Option<&CaseOrder>,
            _offset: u64,
            _limit: u64,
        ) -> Result<Vec<Case>, DomainError> {
            Ok(Vec::new())
        }

        async fn count(&self, _filter: &Scoped<CaseFilter>) -> Result<u64, DomainError> {
            Err(DomainError::DatabaseError("connection reset".into()))
        }
    }

    #[tokio::test]
    async fn test_store_error_propagates_unchanged() {
        let result = paginate(&FailingCount, Uuid::new_v4(), PageQuery::new()).await;
        match result {
            Err(DomainError::DatabaseError(msg)) => assert_eq!(msg, "connection reset"),
            other => panic!("expected database error, got {:?}", other.map(|p| p.total)),
        }
    }
}
