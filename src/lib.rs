/*!
Mesa POS backend library.

Restaurant point-of-sale API: menu management, order lifecycle with daily
ticket numbering, dashboard reporting and the end-of-day archive.
*/

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

// Common response wrapper
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Full API surface, mounted at the root.
pub fn api_routes() -> Router<AppState> {
    let menu = Router::new()
        .route(
            "/menu",
            get(handlers::menu::list_menu).post(handlers::menu::create_menu_item),
        )
        .route(
            "/menu/:id",
            put(handlers::menu::update_menu_item).delete(handlers::menu::delete_menu_item),
        );

    let orders = Router::new()
        .route(
            "/orders",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        // Static segment must be registered before the `:id` capture.
        .route(
            "/orders/check/:table_number",
            get(handlers::orders::check_table),
        )
        .route("/orders/:id", get(handlers::orders::get_order))
        .route(
            "/orders/:id/status",
            put(handlers::orders::update_order_status),
        );

    let dashboard = Router::new()
        .route("/dashboard/stats", get(handlers::dashboard::get_stats))
        .route(
            "/dashboard/archive",
            post(handlers::dashboard::archive_daily_sales),
        );

    let activity = Router::new().route("/history", get(handlers::activity::get_history));

    let health = Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .route("/status", get(handlers::health::liveness_check));

    Router::new()
        .merge(menu)
        .merge(orders)
        .merge(dashboard)
        .merge(activity)
        .merge(health)
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn success_response_wraps_data() {
        let response = ApiResponse::success(42);
        assert!(response.success);
        assert_eq!(response.data, Some(42));
        assert!(response.message.is_none());
    }

    #[test]
    fn error_response_carries_message() {
        let response = ApiResponse::<()>::error("oops".into());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("oops"));
    }
}
