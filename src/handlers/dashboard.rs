use axum::{extract::State, response::Json};

use crate::{
    services::dashboard::{ArchiveResult, DashboardStats},
    ApiResponse, ApiResult, AppState,
};

#[utoipa::path(
    get,
    path = "/dashboard/stats",
    summary = "Dashboard statistics",
    description = "Revenue and transaction count over PAID orders, live kitchen counts, top sellers and recent orders",
    responses(
        (status = 200, description = "Statistics computed", body = ApiResponse<DashboardStats>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "dashboard"
)]
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    let stats = state.services.dashboard.stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

#[utoipa::path(
    post,
    path = "/dashboard/archive",
    summary = "Archive daily sales",
    description = "Moves every non-archived order to ARCHIVED and resets ticket numbering",
    responses(
        (status = 200, description = "Archive completed", body = ApiResponse<ArchiveResult>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "dashboard"
)]
pub async fn archive_daily_sales(State(state): State<AppState>) -> ApiResult<ArchiveResult> {
    let result = state.services.dashboard.archive_daily_sales().await?;
    Ok(Json(ApiResponse::success(result)))
}
