use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::menu_item::Model as MenuItemModel,
    errors::ServiceError,
    services::menu::{CreateMenuItemRequest, UpdateMenuItemRequest},
    ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<MenuItemModel> for MenuItemResponse {
    fn from(model: MenuItemModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            category: model.category,
            image_url: model.image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/menu",
    summary = "List menu items",
    description = "Get the full menu in creation order",
    responses(
        (status = 200, description = "Menu retrieved successfully", body = ApiResponse<Vec<MenuItemResponse>>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "menu"
)]
pub async fn list_menu(State(state): State<AppState>) -> ApiResult<Vec<MenuItemResponse>> {
    let items = state.services.menu.list_menu().await?;
    Ok(Json(ApiResponse::success(
        items.into_iter().map(MenuItemResponse::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/menu",
    summary = "Create menu item",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = ApiResponse<MenuItemResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "menu"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(request): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MenuItemResponse>>), ServiceError> {
    let item = state.services.menu.create_item(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MenuItemResponse::from(item))),
    ))
}

#[utoipa::path(
    put,
    path = "/menu/{id}",
    summary = "Update menu item",
    description = "Partial update; omitted fields are left unchanged",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = ApiResponse<MenuItemResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse),
    ),
    tag = "menu"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMenuItemRequest>,
) -> ApiResult<MenuItemResponse> {
    let item = state.services.menu.update_item(id, request).await?;
    Ok(Json(ApiResponse::success(MenuItemResponse::from(item))))
}

#[utoipa::path(
    delete,
    path = "/menu/{id}",
    summary = "Delete menu item",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Item is referenced by existing orders", body = crate::errors::ErrorResponse),
    ),
    tag = "menu"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state.services.menu.delete_item(id).await?;
    Ok(Json(ApiResponse::success(())))
}
