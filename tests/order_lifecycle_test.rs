//! End-to-end tests for the order lifecycle: creation with ticket
//! numbering and totals, status transitions, the active work queue and
//! table occupancy.

mod common;

use axum::http::{Method, StatusCode};
use common::{money, response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn create_order_computes_totals_and_first_ticket() {
    let app = TestApp::new().await;
    let coke = app.seed_menu_item("Coke", "3.00", "Drinks").await;

    let response = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({
                "tableNumber": 5,
                "orderItems": [{ "itemId": coke, "quantity": 2 }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    let order = &body["data"];
    assert_eq!(order["ticketNumber"], 1);
    assert_eq!(order["tableNumber"], 5);
    assert_eq!(order["status"], "PENDING");
    assert_eq!(money(&order["subtotal"]), dec!(6.00));
    assert_eq!(money(&order["tax"]), dec!(0.30));
    assert_eq!(money(&order["total"]), dec!(6.30));
    assert_eq!(order["items"][0]["name"], "Coke");
    assert_eq!(money(&order["items"][0]["unitPrice"]), dec!(3.00));
    assert_eq!(order["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn ticket_numbers_are_sequential() {
    let app = TestApp::new().await;
    let coke = app.seed_menu_item("Coke", "3.00", "Drinks").await;

    for expected in 1..=3 {
        let response = app
            .request(
                Method::POST,
                "/orders",
                Some(json!({ "orderItems": [{ "itemId": coke, "quantity": 1 }] })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["data"]["ticketNumber"], expected);
    }
}

#[tokio::test]
async fn order_line_prices_are_snapshotted_at_creation() {
    let app = TestApp::new().await;
    let burger = app.seed_menu_item("Classic Burger", "12.50", "Mains").await;
    let order_id = app.seed_order(1, burger, 1).await;

    // Raise the menu price after the order exists.
    let response = app
        .request(
            Method::PUT,
            &format!("/menu/{burger}"),
            Some(json!({ "price": "15.00" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(Method::GET, &format!("/orders/{order_id}"), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(money(&body["data"]["items"][0]["unitPrice"]), dec!(12.50));
    assert_eq!(money(&body["data"]["subtotal"]), dec!(12.50));
}

#[tokio::test]
async fn status_flow_advances_through_the_kitchen() {
    let app = TestApp::new().await;
    let pizza = app.seed_menu_item("Pepperoni Pizza", "13.90", "Mains").await;
    let order_id = app.seed_order(2, pizza, 1).await;

    for status in ["READY", "SERVED", "PAID"] {
        let response = app
            .request(
                Method::PUT,
                &format!("/orders/{order_id}/status"),
                Some(json!({ "status": status })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "transition to {status}");
        let body = response_json(response).await;
        assert_eq!(body["data"]["status"], status);
    }
}

#[tokio::test]
async fn skipping_a_lifecycle_step_is_rejected() {
    let app = TestApp::new().await;
    let pizza = app.seed_menu_item("Veggie Pizza", "12.00", "Mains").await;
    let order_id = app.seed_order(3, pizza, 1).await;

    // PENDING -> PAID skips READY and SERVED.
    let response = app
        .request(
            Method::PUT,
            &format!("/orders/{order_id}/status"),
            Some(json!({ "status": "PAID" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The order is untouched.
    let response = app
        .request(Method::GET, &format!("/orders/{order_id}"), None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "PENDING");
}

#[tokio::test]
async fn any_state_can_be_archived() {
    let app = TestApp::new().await;
    let salad = app.seed_menu_item("Caesar Salad", "9.75", "Starters").await;
    let order_id = app.seed_order(4, salad, 1).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/orders/{order_id}/status"),
            Some(json!({ "status": "ARCHIVED" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "ARCHIVED");
}

#[tokio::test]
async fn occupied_table_rejects_a_second_order() {
    let app = TestApp::new().await;
    let coke = app.seed_menu_item("Coke", "3.00", "Drinks").await;
    app.seed_order(7, coke, 1).await;

    let response = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({
                "tableNumber": 7,
                "orderItems": [{ "itemId": coke, "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn paid_table_frees_up_for_a_new_order() {
    let app = TestApp::new().await;
    let coke = app.seed_menu_item("Coke", "3.00", "Drinks").await;
    let order_id = app.seed_order(8, coke, 1).await;

    for status in ["READY", "SERVED", "PAID"] {
        let response = app
            .request(
                Method::PUT,
                &format!("/orders/{order_id}/status"),
                Some(json!({ "status": status })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({
                "tableNumber": 8,
                "orderItems": [{ "itemId": coke, "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn check_table_reports_the_active_order() {
    let app = TestApp::new().await;
    let coke = app.seed_menu_item("Coke", "3.00", "Drinks").await;

    let response = app.request(Method::GET, "/orders/check/9", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["data"].is_null(), "table 9 starts free");

    let order_id = app.seed_order(9, coke, 1).await;

    let response = app.request(Method::GET, "/orders/check/9", None).await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["id"], order_id.to_string());
    assert_eq!(body["data"]["tableNumber"], 9);
}

#[tokio::test]
async fn unfiltered_list_is_the_active_work_queue() {
    let app = TestApp::new().await;
    let coke = app.seed_menu_item("Coke", "3.00", "Drinks").await;

    let first = app.seed_order(1, coke, 1).await;
    let second = app.seed_order(2, coke, 1).await;

    // Settle the first order entirely.
    for status in ["READY", "SERVED", "PAID"] {
        app.request(
            Method::PUT,
            &format!("/orders/{first}/status"),
            Some(json!({ "status": status })),
        )
        .await;
    }

    let response = app.request(Method::GET, "/orders", None).await;
    let body = response_json(response).await;
    let orders = body["data"].as_array().expect("orders array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], second.to_string());
}

#[tokio::test]
async fn status_filter_matches_exactly() {
    let app = TestApp::new().await;
    let coke = app.seed_menu_item("Coke", "3.00", "Drinks").await;

    let order_id = app.seed_order(1, coke, 1).await;
    app.seed_order(2, coke, 1).await;

    app.request(
        Method::PUT,
        &format!("/orders/{order_id}/status"),
        Some(json!({ "status": "READY" })),
    )
    .await;

    let response = app.request(Method::GET, "/orders?status=READY", None).await;
    let body = response_json(response).await;
    let orders = body["data"].as_array().expect("orders array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], order_id.to_string());

    // A READY order is still part of the unfiltered work queue.
    let response = app.request(Method::GET, "/orders", None).await;
    let body = response_json(response).await;
    let ids: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap().to_string())
        .collect();
    assert!(ids.contains(&order_id.to_string()));
}

#[tokio::test]
async fn unknown_status_filter_is_a_bad_request() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/orders?status=SHIPPED", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_with_unknown_menu_item_is_rejected() {
    let app = TestApp::new().await;
    app.seed_menu_item("Coke", "3.00", "Drinks").await;

    let response = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({
                "orderItems": [{ "itemId": uuid::Uuid::new_v4(), "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was persisted, so the next ticket is still 1.
    let coke = app.seed_menu_item("Coke Zero", "3.00", "Drinks").await;
    let response = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({ "orderItems": [{ "itemId": coke, "quantity": 1 }] })),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["ticketNumber"], 1);
}

#[tokio::test]
async fn empty_order_is_rejected() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::POST, "/orders", Some(json!({ "orderItems": [] })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejected_creation_does_not_consume_a_ticket() {
    let app = TestApp::new().await;
    let coke = app.seed_menu_item("Coke", "3.00", "Drinks").await;
    app.seed_order(7, coke, 1).await;

    // Conflict rolls the whole transaction back, counter bump included.
    let response = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({
                "tableNumber": 7,
                "orderItems": [{ "itemId": coke, "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({
                "tableNumber": 8,
                "orderItems": [{ "itemId": coke, "quantity": 1 }]
            })),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["ticketNumber"], 2);
}

#[tokio::test]
async fn missing_counter_row_is_recreated() {
    use sea_orm::EntityTrait;

    let app = TestApp::new().await;
    let coke = app.seed_menu_item("Coke", "3.00", "Drinks").await;

    mesa_pos::entities::ticket_counter::Entity::delete_by_id(1)
        .exec(&*app.state.db)
        .await
        .expect("delete counter row");

    let response = app
        .request(
            Method::POST,
            "/orders",
            Some(json!({ "orderItems": [{ "itemId": coke, "quantity": 1 }] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["ticketNumber"], 1);
}

#[tokio::test]
async fn missing_order_returns_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            &format!("/orders/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(
            Method::PUT,
            &format!("/orders/{}/status", uuid::Uuid::new_v4()),
            Some(json!({ "status": "READY" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
