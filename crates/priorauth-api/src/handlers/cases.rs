// ============================================================================
// PriorAuth API - Case Handlers
// File: crates/priorauth-api/src/handlers/cases.rs
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use priorauth_core::domain::{Case, CasePriority, CaseStatus};
use priorauth_core::pagination::{ListPages, Page, PageQuery};
use priorauth_core::repositories::CaseFilter;
use priorauth_shared::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use priorauth_shared::PageRequest;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListCasesParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl ListCasesParams {
    fn filter(&self) -> Result<CaseFilter, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(|s| {
                CaseStatus::from_str(s)
                    .ok_or_else(|| ApiError::BadRequest(format!("Unknown case status: {}", s)))
            })
            .transpose()?;

        let priority = self
            .priority
            .as_deref()
            .map(|p| {
                CasePriority::from_str(p)
                    .ok_or_else(|| ApiError::BadRequest(format!("Unknown case priority: {}", p)))
            })
            .transpose()?;

        Ok(CaseFilter { status, priority, ..Default::default() })
    }

    fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// List cases - GET /api/v1/tenants/{tenant_id}/cases
pub async fn list_cases(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Query(params): Query<ListCasesParams>,
) -> Result<Json<ApiResponse<Page<Case>>>, ApiError> {
    let query = PageQuery::new()
        .filter(params.filter()?)
        .request(params.page_request());

    let page = state.db.tenant(tenant_id).cases().list(query).await?;
    Ok(Json(ApiResponse::success(page)))
}
