use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mesa POS API",
        version = "1.0.0",
        description = r#"
# Mesa Point-of-Sale API

Backend for a small restaurant point of sale: menu management, order
lifecycle with daily ticket numbering, kitchen/cashier status flow,
dashboard reporting and an end-of-day archive.

## Order lifecycle

Orders move PENDING -> READY -> SERVED -> PAID; the end-of-day archive
moves every remaining order to ARCHIVED and resets ticket numbering to 1.

## Error handling

Errors use a consistent JSON envelope with appropriate HTTP status codes:

```json
{
  "error": "Not Found",
  "message": "Order with ID ... not found",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development")
    ),
    tags(
        (name = "menu", description = "Menu management endpoints"),
        (name = "orders", description = "Order lifecycle endpoints"),
        (name = "dashboard", description = "Reporting and end-of-day endpoints"),
        (name = "activity", description = "Activity log endpoints")
    ),
    paths(
        crate::handlers::menu::list_menu,
        crate::handlers::menu::create_menu_item,
        crate::handlers::menu::update_menu_item,
        crate::handlers::menu::delete_menu_item,

        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::check_table,

        crate::handlers::dashboard::get_stats,
        crate::handlers::dashboard::archive_daily_sales,

        crate::handlers::activity::get_history,

        // Health probes intentionally omitted from OpenAPI paths
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,

            crate::handlers::menu::MenuItemResponse,
            crate::services::menu::CreateMenuItemRequest,
            crate::services::menu::UpdateMenuItemRequest,

            crate::services::orders::CreateOrderRequest,
            crate::services::orders::CreateOrderLine,
            crate::services::orders::UpdateOrderStatusRequest,
            crate::services::orders::OrderResponse,
            crate::services::orders::OrderLineResponse,
            crate::services::order_status::OrderStatus,

            crate::services::dashboard::DashboardStats,
            crate::services::dashboard::TopItem,
            crate::services::dashboard::ArchiveResult,

            crate::handlers::activity::ActivityEntryResponse,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_generates() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/orders"));
        assert!(doc.paths.paths.contains_key("/menu"));
        assert!(doc.paths.paths.contains_key("/dashboard/stats"));
    }

    #[test]
    fn menu_item_paths_cover_update_and_delete() {
        let doc = ApiDoc::openapi();
        let item_path = doc
            .paths
            .paths
            .get("/menu/{id}")
            .expect("menu item path documented");
        assert!(item_path.put.is_some());
        assert!(item_path.delete.is_some());
    }
}
