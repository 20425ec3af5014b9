use log::{debug, info, warn};

use crate::{
    api::{
        errors::ReconcileError,
        order_objects::{ReconcileAction, ReconcileOutcome, ReconcilePolicy},
    },
    db_types::{OrderId, OrderStatus},
    notifications::{synthetic_paid_payload, Notification, NotificationSource},
    traits::OrderTrackerDatabase,
};

/// Applies normalized payment notifications to the order store.
///
/// Reconciliation is idempotent: replaying the same notification any number of times leaves the store in the same
/// state. The [`ReconcilePolicy`] decides whether a notification may move an order *out* of a terminal state.
pub struct ReconcileApi<B> {
    db: B,
    policy: ReconcilePolicy,
}

impl<B> ReconcileApi<B>
where B: OrderTrackerDatabase
{
    pub fn new(db: B, policy: ReconcilePolicy) -> Self {
        Self { db, policy }
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    /// Applies a single notification to the store and reports what happened.
    pub async fn reconcile(&self, notification: &Notification) -> Result<ReconcileOutcome, ReconcileError> {
        let order = self
            .db
            .fetch_order_by_id(&notification.order_id)
            .await?
            .ok_or_else(|| ReconcileError::OrderNotFound(notification.order_id.clone()))?;
        let previous = order.status;
        let derived = notification.status;
        if previous == derived {
            debug!("🔄️ Order {} already {derived}, notification from {} is a no-op", order.id, notification.source);
            return Ok(ReconcileOutcome { order, previous_status: previous, derived_status: derived, action: ReconcileAction::NoOp });
        }
        if self.policy == ReconcilePolicy::ForwardOnly && previous.is_terminal() {
            warn!(
                "🔄️ Refusing to move order {} from {previous} to {derived} under the forward-only policy",
                order.id
            );
            return Ok(ReconcileOutcome {
                order,
                previous_status: previous,
                derived_status: derived,
                action: ReconcileAction::Refused,
            });
        }
        let only_from = match self.policy {
            ReconcilePolicy::ForwardOnly => Some(OrderStatus::Pending),
            ReconcilePolicy::LastWriteWins => None,
        };
        match self.db.update_order_status(&notification.order_id, derived, only_from).await? {
            Some(updated) => {
                info!("🔄️ Order {} moved from {previous} to {derived} ({})", updated.id, notification.source);
                Ok(ReconcileOutcome {
                    order: updated,
                    previous_status: previous,
                    derived_status: derived,
                    action: ReconcileAction::Updated,
                })
            },
            // The guard refused the write, so another reconciliation won the race. Report the state as it stands now.
            None => {
                let order = self
                    .db
                    .fetch_order_by_id(&notification.order_id)
                    .await?
                    .ok_or_else(|| ReconcileError::OrderNotFound(notification.order_id.clone()))?;
                debug!("🔄️ Concurrent update beat us to order {}; it is now {}", order.id, order.status);
                let previous = order.status;
                Ok(ReconcileOutcome { order, previous_status: previous, derived_status: derived, action: ReconcileAction::NoOp })
            },
        }
    }

    /// Simulates a successful gateway webhook for the given order.
    ///
    /// Builds the same payload the gateway would send for a settled debt and runs it through the normal
    /// reconciliation path, so the entire flow short of the HTTP hop gets exercised.
    pub async fn replay_paid(&self, id: &OrderId) -> Result<ReconcileOutcome, ReconcileError> {
        let order =
            self.db.fetch_order_by_id(id).await?.ok_or_else(|| ReconcileError::OrderNotFound(id.clone()))?;
        let payload = synthetic_paid_payload(&order);
        let mut notification = Notification::from_webhook(&payload)?;
        notification.source = NotificationSource::Manual;
        self.reconcile(&notification).await
    }
}
