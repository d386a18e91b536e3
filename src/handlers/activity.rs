use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{entities::activity_log::Model as LogModel, ApiResponse, ApiResult, AppState};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntryResponse {
    pub id: Uuid,
    pub action: String,
    pub details: String,
    /// Role that performed the action (Manager, Waiter, Kitchen, Cashier).
    pub user: String,
    pub created_at: DateTime<Utc>,
}

impl From<LogModel> for ActivityEntryResponse {
    fn from(model: LogModel) -> Self {
        Self {
            id: model.id,
            action: model.action,
            details: model.details,
            user: model.actor,
            created_at: model.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/history",
    summary = "Activity history",
    description = "Last 100 activity-log entries, newest first",
    responses(
        (status = 200, description = "History retrieved successfully", body = ApiResponse<Vec<ActivityEntryResponse>>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "activity"
)]
pub async fn get_history(State(state): State<AppState>) -> ApiResult<Vec<ActivityEntryResponse>> {
    let entries = state.services.activity.history().await?;
    Ok(Json(ApiResponse::success(
        entries
            .into_iter()
            .map(ActivityEntryResponse::from)
            .collect(),
    )))
}
