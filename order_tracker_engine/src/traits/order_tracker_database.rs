use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderId, OrderStatus};

/// The behaviour a backend must provide to act as the order store for the tracker.
///
/// This is deliberately small: orders are created once, looked up by id, and have their status moved by the
/// reconciler. There is no deletion path.
#[allow(async_fn_in_trait)]
pub trait OrderTrackerDatabase {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Stores a brand-new order with PENDING status. Returns the stored record, including the DB-assigned
    /// timestamps. Fails with [`TrackerDbError::OrderAlreadyExists`] if the id is already taken.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, TrackerDbError>;

    /// Fetches the order with the given id, or `None` if it does not exist.
    async fn fetch_order_by_id(&self, id: &OrderId) -> Result<Option<Order>, TrackerDbError>;

    /// Conditionally moves the order to `status` in a single guarded UPDATE.
    ///
    /// The write only happens when the stored status differs from `status`, and, if `only_from` is given, when the
    /// stored status equals `only_from`. Returns the updated order when a row was written, and `None` when the guard
    /// refused the write (including when the order does not exist). Because the guard rides in the statement itself,
    /// two concurrent reconciliations for the same order cannot interleave a read-compute-write cycle.
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        only_from: Option<OrderStatus>,
    ) -> Result<Option<Order>, TrackerDbError>;

    /// Records the payment link for the order. The link may be overwritten by fallback logic.
    async fn set_payment_link(&self, id: &OrderId, link: &str) -> Result<Order, TrackerDbError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), TrackerDbError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum TrackerDbError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Cannot insert order {0}, since it already exists")]
    OrderAlreadyExists(OrderId),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
}

impl From<sqlx::Error> for TrackerDbError {
    fn from(e: sqlx::Error) -> Self {
        TrackerDbError::DatabaseError(e.to_string())
    }
}
