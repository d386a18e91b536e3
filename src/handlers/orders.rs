use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    services::order_status::OrderStatus,
    services::orders::{CreateOrderRequest, OrderResponse, UpdateOrderStatusRequest},
    ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOrdersQuery {
    /// Exact status to match; omit for the active work queue.
    pub status: Option<String>,
}

#[utoipa::path(
    post,
    path = "/orders",
    summary = "Create order",
    description = "Creates an order with a fresh ticket number; rejects occupied tables",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Table already has an active order", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponse>>), ServiceError> {
    let order = state.services.orders.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

#[utoipa::path(
    get,
    path = "/orders",
    summary = "List orders",
    description = "Without a status filter, returns the active work queue (not PAID/ARCHIVED), oldest first",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Orders retrieved successfully", body = ApiResponse<Vec<OrderResponse>>),
        (status = 400, description = "Unknown status filter", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<Vec<OrderResponse>> {
    let filter = query
        .status
        .as_deref()
        .map(OrderStatus::parse)
        .transpose()?;
    let orders = state.services.orders.list_orders(filter).await?;
    Ok(Json(ApiResponse::success(orders)))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    summary = "Get order",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order retrieved successfully", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderResponse> {
    let order = state.services.orders.get_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    summary = "Update order status",
    description = "Advances an order along PENDING -> READY -> SERVED -> PAID; any state may be archived",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid status transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> ApiResult<OrderResponse> {
    let order = state.services.orders.update_status(id, request).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    get,
    path = "/orders/check/{table_number}",
    summary = "Check table availability",
    description = "Returns the active order occupying the table, or null when the table is free",
    params(("table_number" = i32, Path, description = "Table number")),
    responses(
        (status = 200, description = "Lookup completed", body = ApiResponse<Option<OrderResponse>>),
    ),
    tag = "orders"
)]
pub async fn check_table(
    State(state): State<AppState>,
    Path(table_number): Path<i32>,
) -> ApiResult<Option<OrderResponse>> {
    let active = state.services.orders.check_table(table_number).await?;
    Ok(Json(ApiResponse::success(active)))
}
