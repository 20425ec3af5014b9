use actix_web::{http::StatusCode, web, web::ServiceConfig};
use order_tracker_engine::{db_types::OrderStatus, ReconcileApi, ReconcilePolicy};
use serde_json::json;

use super::{
    helpers::{post_raw, post_request},
    mocks::{test_order, MockOrderTrackerDb, TEST_ORDER_ID},
};
use crate::routes::configure_api;

#[actix_web::test]
async fn paid_webhook_updates_the_order() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "notify": "debtStatus",
        "debt": { "docId": TEST_ORDER_ID, "payStatus": { "status": "paid" } }
    });
    let (status, body) = post_request("/adams/callback", body, configure_pending_order).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"action\":\"Updated\""), "{body}");
    assert!(body.contains("\"final_status\":\"PAID\""), "{body}");
}

#[actix_web::test]
async fn repeated_webhook_is_a_noop() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "externalId": TEST_ORDER_ID, "status": "paid" });
    // The store already has the order as PAID and no update expectation is registered
    let (status, body) = post_request("/adams/callback", body, configure_paid_order).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"action\":\"NoOp\""), "{body}");
}

#[actix_web::test]
async fn webhook_without_identifier_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("/adams/callback", json!({}), configure_no_db).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("\"success\":false"), "{body}");
}

#[actix_web::test]
async fn webhook_with_malformed_identifier_never_touches_the_store() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "externalId": "not-a-uuid", "status": "paid" });
    let (status, body) = post_request("/adams/callback", body, configure_no_db).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("malformed"), "{body}");
}

#[actix_web::test]
async fn losing_the_update_race_is_reported_as_a_noop() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "externalId": TEST_ORDER_ID, "status": "paid" });
    // The order reads PENDING, but another writer settles it as FAILED before the guarded update lands
    let (status, body) = post_request("/adams/callback", body, configure_lost_race).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"action\":\"NoOp\""), "{body}");
    assert!(body.contains("\"final_status\":\"FAILED\""), "{body}");
}

#[actix_web::test]
async fn webhook_for_unknown_order_is_a_404() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "externalId": TEST_ORDER_ID, "status": "paid" });
    let (status, body) = post_request("/adams/callback", body, configure_missing_order).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("does not exist"), "{body}");
}

#[actix_web::test]
async fn unparseable_body_gets_the_structured_error_shape() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_raw("/adams/callback", "{not json", configure_no_db).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("\"success\":false"), "{body}");
}

#[actix_web::test]
async fn string_payload_is_unwrapped() {
    let _ = env_logger::try_init().ok();
    let inner = json!({ "debt": { "docId": TEST_ORDER_ID, "payStatus": { "status": "paid" } } }).to_string();
    let (status, body) =
        post_request("/adams/callback", json!(inner), configure_pending_order).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"action\":\"Updated\""), "{body}");
}

fn register(cfg: &mut ServiceConfig, db: MockOrderTrackerDb) {
    let reconciler = ReconcileApi::new(db, ReconcilePolicy::default());
    cfg.app_data(web::Data::new(reconciler)).configure(configure_api::<MockOrderTrackerDb>);
}

fn configure_pending_order(cfg: &mut ServiceConfig) {
    let mut db = MockOrderTrackerDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(Some(test_order(OrderStatus::Pending))));
    db.expect_update_order_status().returning(|_, status, _| Ok(Some(test_order(status))));
    register(cfg, db);
}

fn configure_paid_order(cfg: &mut ServiceConfig) {
    let mut db = MockOrderTrackerDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(Some(test_order(OrderStatus::Paid))));
    register(cfg, db);
}

fn configure_lost_race(cfg: &mut ServiceConfig) {
    let mut db = MockOrderTrackerDb::new();
    db.expect_fetch_order_by_id().times(1).returning(|_| Ok(Some(test_order(OrderStatus::Pending))));
    db.expect_update_order_status().returning(|_, _, _| Ok(None));
    db.expect_fetch_order_by_id().returning(|_| Ok(Some(test_order(OrderStatus::Failed))));
    let reconciler = ReconcileApi::new(db, ReconcilePolicy::ForwardOnly);
    cfg.app_data(web::Data::new(reconciler)).configure(configure_api::<MockOrderTrackerDb>);
}

fn configure_missing_order(cfg: &mut ServiceConfig) {
    let mut db = MockOrderTrackerDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));
    register(cfg, db);
}

fn configure_no_db(cfg: &mut ServiceConfig) {
    register(cfg, MockOrderTrackerDb::new());
}
