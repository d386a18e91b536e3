use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use mesa_pos::{config::AppConfig, db, handlers::AppServices, AppState};

/// Helper harness for spinning up an application state backed by an
/// in-memory SQLite database.
pub struct TestApp {
    router: Router,
    #[allow(dead_code)]
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        // A single connection keeps every query on the same in-memory DB.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let tax_rate = Decimal::new(5, 2); // 5%
        let services = AppServices::new(db_arc.clone(), tax_rate);

        let state = AppState {
            db: db_arc,
            config: cfg,
            services,
        };

        let router = mesa_pos::api_routes().with_state(state.clone());

        Self { router, state }
    }

    /// Send a JSON request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Create a menu item and return its id.
    pub async fn seed_menu_item(&self, name: &str, price: &str, category: &str) -> Uuid {
        let response = self
            .request(
                Method::POST,
                "/menu",
                Some(json!({ "name": name, "price": price, "category": category })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED, "seeding menu item");

        let body = response_json(response).await;
        body["data"]["id"]
            .as_str()
            .expect("created menu item id")
            .parse()
            .expect("menu item id is a uuid")
    }

    /// Create an order for a table with one line and return its id.
    #[allow(dead_code)]
    pub async fn seed_order(&self, table: i32, item_id: Uuid, quantity: i32) -> Uuid {
        let response = self
            .request(
                Method::POST,
                "/orders",
                Some(json!({
                    "tableNumber": table,
                    "orderItems": [{ "itemId": item_id, "quantity": quantity }]
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED, "seeding order");

        let body = response_json(response).await;
        body["data"]["id"]
            .as_str()
            .expect("created order id")
            .parse()
            .expect("order id is a uuid")
    }
}

/// Parses a money field, tolerating string or numeric JSON encodings.
/// Comparisons go through `Decimal`, which ignores trailing zeros.
#[allow(dead_code)]
pub fn money(value: &Value) -> Decimal {
    use rust_decimal::prelude::FromPrimitive;

    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => {
            Decimal::from_f64(n.as_f64().expect("numeric money value")).expect("decimal number")
        }
        other => panic!("not a money value: {other:?}"),
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
