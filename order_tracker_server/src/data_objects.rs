use std::fmt::Display;

use order_tracker_engine::{
    db_types::{Order, OrderId, OrderStatus},
    ReconcileAction,
    ReconcileOutcome,
};
use ot_common::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderRequest {
    pub product_name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedResponse {
    pub order: Order,
    pub payment_link: String,
    /// Present when the gateway could not be reached and a fallback link was issued instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// The report returned by the webhook and manual test-payment endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub order_id: OrderId,
    pub previous_status: OrderStatus,
    pub derived_status: OrderStatus,
    pub final_status: OrderStatus,
    pub action: ReconcileAction,
    pub message: String,
}

impl From<ReconcileOutcome> for ReconcileReport {
    fn from(outcome: ReconcileOutcome) -> Self {
        let message = outcome.report();
        Self {
            order_id: outcome.order.id.clone(),
            previous_status: outcome.previous_status,
            derived_status: outcome.derived_status,
            final_status: outcome.order.status,
            action: outcome.action,
            message,
        }
    }
}
