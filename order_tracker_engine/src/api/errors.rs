use thiserror::Error;

use crate::{db_types::OrderId, traits::TrackerDbError};

//--------------------------------------   ReconcileError    ---------------------------------------------------------
/// Everything that can go wrong between receiving a raw notification and applying its status to an order.
///
/// The first three variants are produced while normalizing the payload, before the store is touched at all.
#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    #[error("The notification did not contain an order identifier")]
    MissingIdentifier,
    #[error("The notification identifier is malformed. {0}")]
    InvalidIdentifier(String),
    #[error("The notification payload shape was not recognized: {0}")]
    UnrecognizedPayload(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<TrackerDbError> for ReconcileError {
    fn from(e: TrackerDbError) -> Self {
        match e {
            TrackerDbError::OrderNotFound(id) => Self::OrderNotFound(id),
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

//--------------------------------------    OrderApiError    ---------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),
    #[error("Order {0} already exists")]
    OrderAlreadyExists(OrderId),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<TrackerDbError> for OrderApiError {
    fn from(e: TrackerDbError) -> Self {
        match e {
            TrackerDbError::OrderAlreadyExists(id) => Self::OrderAlreadyExists(id),
            TrackerDbError::OrderNotFound(id) => Self::OrderNotFound(id),
            TrackerDbError::DatabaseError(e) => Self::DatabaseError(e),
        }
    }
}
