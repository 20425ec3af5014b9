//! Notification normalization.
//!
//! The gateway delivers payment-status signals in several loosely-related shapes: webhook POST bodies (sometimes a
//! JSON object, sometimes a JSON string containing a serialized object), redirect query parameters, and the manual
//! test trigger. All shape-sniffing lives in this module: a payload is probed exactly once and turned into a
//! normalized [`Notification`] record, and the reconciler never sees raw JSON.

use std::fmt::Display;

use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    api::errors::ReconcileError,
    db_types::{Order, OrderId, OrderStatus},
};

/// Field paths probed for an order identifier in a JSON object payload, in decreasing order of preference.
/// The precedence is load-bearing: callers send payloads where several probes match at once.
const OBJECT_PROBES: [&str; 4] = ["externalId", "debt.docId", "id", "order_id"];

/// When the payload is a JSON *string* containing a serialized object, only the gateway's own field paths are probed
/// on the parsed result.
const STRING_PROBES: [&str; 2] = ["externalId", "debt.docId"];

//--------------------------------------    Notification     ---------------------------------------------------------
/// A normalized inbound payment-status signal: the validated order it refers to, the canonical status it asserts, and
/// where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub source: NotificationSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSource {
    Webhook,
    Redirect,
    Manual,
}

impl Display for NotificationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationSource::Webhook => write!(f, "webhook"),
            NotificationSource::Redirect => write!(f, "redirect"),
            NotificationSource::Manual => write!(f, "manual trigger"),
        }
    }
}

impl Notification {
    /// Normalizes a webhook POST body.
    ///
    /// Object payloads are probed directly. String payloads are parsed as JSON first and then probed with the
    /// gateway's own field paths; a parse failure is treated as "no identifier found", never as a fault. Anything
    /// else is an unrecognized shape.
    pub fn from_webhook(payload: &Value) -> Result<Self, ReconcileError> {
        match payload {
            Value::Object(_) => Self::from_mapping(payload, &OBJECT_PROBES, NotificationSource::Webhook),
            Value::String(s) => {
                let inner = serde_json::from_str::<Value>(s).unwrap_or(Value::Null);
                if inner.is_object() {
                    Self::from_mapping(&inner, &STRING_PROBES, NotificationSource::Webhook)
                } else {
                    Err(ReconcileError::MissingIdentifier)
                }
            },
            other => Err(ReconcileError::UnrecognizedPayload(format!(
                "expected a JSON object or string, got {}",
                json_type_name(other)
            ))),
        }
    }

    /// Normalizes the user-facing redirect. The gateway appends `order_id` (or `externalId`) and a free-text `status`
    /// token to the return URL; the token vocabulary here is smaller than the webhook one and anything unknown maps
    /// to PENDING.
    pub fn from_redirect(raw_id: &str, status_token: Option<&str>) -> Result<Self, ReconcileError> {
        let order_id =
            OrderId::try_from_str(raw_id).map_err(|e| ReconcileError::InvalidIdentifier(e.to_string()))?;
        let status = status_token.map(map_redirect_token).unwrap_or_default();
        Ok(Self { order_id, status, source: NotificationSource::Redirect })
    }

    fn from_mapping(payload: &Value, probes: &[&str], source: NotificationSource) -> Result<Self, ReconcileError> {
        let raw_id = extract_identifier(payload, probes).ok_or(ReconcileError::MissingIdentifier)?;
        let order_id =
            OrderId::try_from_str(&raw_id).map_err(|e| ReconcileError::InvalidIdentifier(e.to_string()))?;
        let status = derive_status(payload);
        Ok(Self { order_id, status, source })
    }
}

//--------------------------------------  Identifier probes  ---------------------------------------------------------
fn extract_identifier(payload: &Value, probes: &[&str]) -> Option<String> {
    probes.iter().find_map(|path| field_at(payload, path).and_then(value_as_identifier))
}

/// Walks a dot-separated field path into a JSON object.
fn field_at<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(payload, |v, key| v.get(key))
}

/// Identifiers arrive as strings in practice, but a numeric id is taken at face value too; UUID validation rejects it
/// downstream with a precise error rather than a generic "missing identifier".
fn value_as_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

//--------------------------------------  Status derivation  ---------------------------------------------------------
/// Computes the canonical status asserted by a payload.
///
/// The guess starts at PENDING. A top-level `status` token refines it, and a nested `debt.payStatus.status` token
/// overrides that in turn: the nested field is the gateway's most specific signal. Unrecognized tokens leave the
/// current guess untouched.
pub fn derive_status(payload: &Value) -> OrderStatus {
    let mut status = OrderStatus::Pending;
    if let Some(token) = field_at(payload, "status").and_then(Value::as_str) {
        if let Some(mapped) = map_status_token(token) {
            status = mapped;
        }
    }
    if let Some(token) = field_at(payload, "debt.payStatus.status").and_then(Value::as_str) {
        if let Some(mapped) = map_status_token(token) {
            status = mapped;
        }
    }
    status
}

/// The webhook token table. Case-insensitive; unknown tokens map to `None` ("no change to the current guess").
pub fn map_status_token(token: &str) -> Option<OrderStatus> {
    match token.to_lowercase().as_str() {
        "paid" | "approved" | "completed" | "confirmed" => Some(OrderStatus::Paid),
        "failed" | "rejected" | "expired" | "cancelled" => Some(OrderStatus::Failed),
        "pending" | "in_process" | "created" => Some(OrderStatus::Pending),
        _ => None,
    }
}

/// The (smaller) redirect token table. Unknown tokens fall back to PENDING rather than "no change", since a redirect
/// carries no other status signal.
pub fn map_redirect_token(token: &str) -> OrderStatus {
    match token.to_lowercase().as_str() {
        "completed" | "paid" | "approved" => OrderStatus::Paid,
        "failed" | "rejected" => OrderStatus::Failed,
        _ => OrderStatus::Pending,
    }
}

//--------------------------------------  Synthetic payload  ---------------------------------------------------------
/// Builds a full gateway-shaped "debt paid" payload for an existing order. The manual test trigger pushes this
/// through the same parse-and-reconcile path as a live webhook, so the nested probes get exercised for real.
pub fn synthetic_paid_payload(order: &Order) -> Value {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    json!({
        "notify": "debtStatus",
        "debt": {
            "docId": order.id.as_str(),
            "label": order.product_name,
            "amount": { "value": order.amount.to_string() },
            "objStatus": { "status": "active" },
            "payStatus": { "status": "paid", "time": now }
        }
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
