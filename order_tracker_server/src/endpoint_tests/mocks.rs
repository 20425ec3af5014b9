use chrono::Utc;
use mockall::mock;
use order_tracker_engine::{
    db_types::{NewOrder, Order, OrderId, OrderStatus},
    traits::{OrderTrackerDatabase, TrackerDbError},
};
use ot_common::{Money, Secret};

use crate::config::AdamsPayConfig;

mock! {
    pub OrderTrackerDb {}
    impl OrderTrackerDatabase for OrderTrackerDb {
        fn url(&self) -> &str;
        async fn insert_order(&self, order: NewOrder) -> Result<Order, TrackerDbError>;
        async fn fetch_order_by_id(&self, id: &OrderId) -> Result<Option<Order>, TrackerDbError>;
        async fn update_order_status(
            &self,
            id: &OrderId,
            status: OrderStatus,
            only_from: Option<OrderStatus>,
        ) -> Result<Option<Order>, TrackerDbError>;
        async fn set_payment_link(&self, id: &OrderId, link: &str) -> Result<Order, TrackerDbError>;
    }
}

pub const TEST_ORDER_ID: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";

pub fn test_order(status: OrderStatus) -> Order {
    Order {
        id: OrderId::try_from_str(TEST_ORDER_ID).unwrap(),
        product_name: "Burger".to_string(),
        amount: Money::from(25_000),
        status,
        payment_link: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A gateway config with no API key, so handlers run in simulation mode and never make network calls.
pub fn simulation_gateway_config() -> AdamsPayConfig {
    AdamsPayConfig {
        base_url: "https://staging.adamspay.com".to_string(),
        api_key: Secret::default(),
        callback_url: String::default(),
        merchant: "onofre".to_string(),
        webhook_secret: Secret::default(),
        debt_validity_days: 2,
        fx_multiplier: 1,
        currency: "PYG".to_string(),
    }
}
