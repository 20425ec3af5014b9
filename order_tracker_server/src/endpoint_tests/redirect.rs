use actix_web::{http::StatusCode, web, web::ServiceConfig};
use order_tracker_engine::{db_types::OrderStatus, ReconcileApi, ReconcilePolicy};

use super::{
    helpers::{get_request, post_request},
    mocks::{test_order, MockOrderTrackerDb, TEST_ORDER_ID},
};
use crate::routes::configure_api;

#[actix_web::test]
async fn completed_redirect_shows_the_paid_page() {
    let _ = env_logger::try_init().ok();
    let path = format!("/adams/return?externalId={TEST_ORDER_ID}&status=completed");
    let (status, body) = get_request(&path, configure_pending_order).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Payment received"), "{body}");
    assert!(body.contains("PAID"), "{body}");
}

#[actix_web::test]
async fn order_id_parameter_is_accepted_too() {
    let _ = env_logger::try_init().ok();
    let path = format!("/adams/return?order_id={TEST_ORDER_ID}&status=completed");
    let (status, body) = get_request(&path, configure_pending_order).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("PAID"), "{body}");
}

#[actix_web::test]
async fn redirect_without_status_shows_the_pending_page() {
    let _ = env_logger::try_init().ok();
    let path = format!("/adams/return?externalId={TEST_ORDER_ID}");
    let (status, body) = get_request(&path, configure_stays_pending).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Payment pending"), "{body}");
}

#[actix_web::test]
async fn redirect_for_unknown_order_renders_an_error_page() {
    let _ = env_logger::try_init().ok();
    let path = format!("/adams/return?externalId={TEST_ORDER_ID}&status=completed");
    let (status, body) = get_request(&path, configure_missing_order).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Order not found"), "{body}");
}

#[actix_web::test]
async fn redirect_without_an_order_reference_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/adams/return?status=completed", configure_no_db).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Missing order"), "{body}");
}

#[actix_web::test]
async fn test_payment_settles_a_pending_order() {
    let _ = env_logger::try_init().ok();
    let path = format!("/orders/{TEST_ORDER_ID}/test-payment");
    let (status, body) =
        post_request(&path, serde_json::json!({}), configure_pending_order).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"action\":\"Updated\""), "{body}");
    assert!(body.contains("\"final_status\":\"PAID\""), "{body}");
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

fn configure_stays_pending(cfg: &mut ServiceConfig) {
    let mut db = MockOrderTrackerDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(Some(test_order(OrderStatus::Pending))));
    register(cfg, db);
}

fn configure_missing_order(cfg: &mut ServiceConfig) {
    let mut db = MockOrderTrackerDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));
    register(cfg, db);
}

fn configure_no_db(cfg: &mut ServiceConfig) {
    register(cfg, MockOrderTrackerDb::new());
}
