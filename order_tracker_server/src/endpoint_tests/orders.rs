use actix_web::{http::StatusCode, web, web::ServiceConfig};
use order_tracker_engine::{db_types::OrderStatus, OrderApi};
use serde_json::json;

use super::{
    helpers::{get_request, post_request},
    mocks::{simulation_gateway_config, test_order, MockOrderTrackerDb, TEST_ORDER_ID},
};
use crate::{integrations::AdamsPayApi, routes::configure_api};

#[actix_web::test]
async fn create_order_in_simulation_mode() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "product_name": "Burger", "amount": 25000 });
    let (status, body) = post_request("/orders", body, configure_create).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    // No API key is configured, so the payment link is the locally-built fallback
    assert!(body.contains(&format!("https://staging.adamspay.com/pay/onofre/debt/{TEST_ORDER_ID}")), "{body}");
    assert!(body.contains("PENDING"), "{body}");
    assert!(!body.contains("warning"), "{body}");
}

#[actix_web::test]
async fn create_order_rejects_empty_product_name() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "product_name": "   ", "amount": 25000 });
    let (status, body) = post_request("/orders", body, configure_no_db).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("product_name"), "{body}");
}

#[actix_web::test]
async fn create_order_rejects_non_positive_amount() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "product_name": "Burger", "amount": 0 });
    let (status, body) = post_request("/orders", body, configure_no_db).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("strictly positive"), "{body}");
}

#[actix_web::test]
async fn order_status_is_returned() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request(&format!("/orders/{TEST_ORDER_ID}"), configure_fetch).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(TEST_ORDER_ID), "{body}");
    assert!(body.contains("PAID"), "{body}");
}

#[actix_web::test]
async fn missing_order_is_a_404() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request(&format!("/orders/{TEST_ORDER_ID}"), configure_fetch_none).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("does not exist"), "{body}");
}

#[actix_web::test]
async fn malformed_order_id_is_a_400() {
    let _ = env_logger::try_init().ok();
    // The id is rejected before the store is consulted: the mock has no expectations
    let (status, body) = get_request("/orders/not-a-uuid", configure_no_db).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("not a valid order id"), "{body}");
}

fn register(cfg: &mut ServiceConfig, db: MockOrderTrackerDb) {
    let orders_api = OrderApi::new(db);
    let gateway = AdamsPayApi::new(simulation_gateway_config()).unwrap();
    cfg.app_data(web::Data::new(orders_api)).app_data(web::Data::new(gateway)).configure(configure_api::<MockOrderTrackerDb>);
}

fn configure_create(cfg: &mut ServiceConfig) {
    let mut db = MockOrderTrackerDb::new();
    db.expect_insert_order().returning(|_| Ok(test_order(OrderStatus::Pending)));
    db.expect_set_payment_link().returning(|_, link| {
        let mut order = test_order(OrderStatus::Pending);
        order.payment_link = Some(link.to_string());
        Ok(order)
    });
    register(cfg, db);
}

fn configure_fetch(cfg: &mut ServiceConfig) {
    let mut db = MockOrderTrackerDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(Some(test_order(OrderStatus::Paid))));
    register(cfg, db);
}

fn configure_fetch_none(cfg: &mut ServiceConfig) {
    let mut db = MockOrderTrackerDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));
    register(cfg, db);
}

fn configure_no_db(cfg: &mut ServiceConfig) {
    register(cfg, MockOrderTrackerDb::new());
}
