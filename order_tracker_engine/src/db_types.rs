use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use ot_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use uuid::Uuid;

//--------------------------------------     OrderStatus     ---------------------------------------------------------
/// The canonical order states in this system, distinct from the gateway's own vocabulary. Gateway status tokens are
/// mapped onto these three states by [`crate::notifications`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// The order has been created and no definitive payment signal has been received.
    #[default]
    Pending,
    /// The gateway reported the debt as settled.
    Paid,
    /// The gateway reported the payment as failed, rejected, expired or cancelled.
    Failed,
}

impl OrderStatus {
    /// Pending is the only state a forward-only reconciler will move away from.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Paid => write!(f, "PAID"),
            OrderStatus::Failed => write!(f, "FAILED"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct StatusConversionError(String);

impl FromStr for OrderStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "FAILED" => Ok(Self::Failed),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------       OrderId       ---------------------------------------------------------
/// A lightweight wrapper around the order's UUID, stored as its hyphenated lowercase string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(String);

#[derive(Debug, Clone, Error)]
#[error("'{0}' is not a valid order id")]
pub struct InvalidOrderId(String);

impl OrderId {
    /// Generates a fresh random (v4) order id.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Validates that `s` is a syntactically valid UUID and returns the normalized id.
    pub fn try_from_str(s: &str) -> Result<Self, InvalidOrderId> {
        let uuid = Uuid::parse_str(s.trim()).map_err(|_| InvalidOrderId(s.to_string()))?;
        Ok(Self(uuid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = InvalidOrderId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product_name: String,
    /// Pass-through monetary value. Any gateway currency conversion is applied by the caller, not stored here.
    pub amount: Money,
    pub status: OrderStatus,
    /// The gateway payment URL, or a best-effort fallback link when registration failed.
    pub payment_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder      ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub product_name: String,
    pub amount: Money,
}

impl NewOrder {
    pub fn new<S: Into<String>>(product_name: S, amount: Money) -> Self {
        Self { order_id: OrderId::random(), product_name: product_name.into(), amount }
    }
}
