use chrono::{DateTime, Utc};
use ot_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderId, OrderStatus};

//--------------------------------------     OrderResult     ---------------------------------------------------------
/// The read-only projection of an order returned to polling clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    pub id: OrderId,
    pub product_name: String,
    pub amount: Money,
    pub status: OrderStatus,
    pub payment_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResult {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            product_name: order.product_name,
            amount: order.amount,
            status: order.status,
            payment_link: order.payment_link,
            created_at: order.created_at,
        }
    }
}

//--------------------------------------   ReconcilePolicy   ---------------------------------------------------------
/// How the reconciler treats a notification that would move an order *out* of a terminal state.
///
/// The gateway never un-pays a debt, but notifications can arrive out of order: with `LastWriteWins` a late PENDING
/// can overwrite a PAID (the historical behaviour of this system). `ForwardOnly` only ever moves an order out of
/// PENDING and reports anything else as [`ReconcileAction::Refused`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcilePolicy {
    #[default]
    LastWriteWins,
    ForwardOnly,
}

//--------------------------------------   ReconcileOutcome  ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileAction {
    /// The order status was changed and persisted.
    Updated,
    /// The order was already in the derived state; nothing was written.
    NoOp,
    /// The forward-only policy refused to move the order out of a terminal state.
    Refused,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// The order as stored after reconciliation.
    pub order: Order,
    pub previous_status: OrderStatus,
    pub derived_status: OrderStatus,
    pub action: ReconcileAction,
}

impl ReconcileOutcome {
    /// A one-line human-readable report, used by the webhook response and the manual test trigger.
    pub fn report(&self) -> String {
        match self.action {
            ReconcileAction::Updated => {
                format!("Order {} moved from {} to {}", self.order.id, self.previous_status, self.derived_status)
            },
            ReconcileAction::NoOp => format!("Order {} already in state {}", self.order.id, self.previous_status),
            ReconcileAction::Refused => format!(
                "Ignored status regression from {} to {} for order {}",
                self.previous_status, self.derived_status, self.order.id
            ),
        }
    }
}
