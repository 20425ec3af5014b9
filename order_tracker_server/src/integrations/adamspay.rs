//! Client for the AdamsPay debt API.
//!
//! Every order placed with the tracker gets a matching "debt" registered with the gateway. The gateway responds with
//! a hosted payment URL, notifies the webhook endpoint when the debt is settled, and redirects the payer back to the
//! return endpoint.

use std::sync::Arc;

use chrono::{Duration, Utc};
use log::*;
use order_tracker_engine::db_types::Order;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::AdamsPayConfig;

/// Debts are re-registered rather than duplicated when an order is re-submitted.
const IF_EXISTS: &str = "update";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid request: {0}")]
    RequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Invalid debt amount: {0}")]
    InvalidAmount(String),
}

/// The result of registering a debt with the gateway.
#[derive(Debug, Clone)]
pub struct DebtRegistration {
    pub debt_id: String,
    pub pay_url: Option<String>,
}

#[derive(Clone)]
pub struct AdamsPayApi {
    config: AdamsPayConfig,
    client: Arc<Client>,
}

impl AdamsPayApi {
    pub fn new(config: AdamsPayConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::with_capacity(3);
        let val = HeaderValue::from_str(config.api_key.reveal().as_str())
            .map_err(|e| GatewayError::Initialization(e.to_string()))?;
        headers.insert("apikey", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("x-if-exists", HeaderValue::from_static(IF_EXISTS));
        let client =
            Client::builder().default_headers(headers).build().map_err(|e| GatewayError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// True when no API key is configured. In simulation mode the server never calls the gateway and issues locally
    /// built fallback links instead.
    pub fn is_simulation(&self) -> bool {
        self.config.api_key.reveal().is_empty()
    }

    pub fn debts_url(&self) -> String {
        format!("{}/api/v1/debts", self.config.base_url)
    }

    /// The hosted payment page for a debt. Always resolvable from the debt id alone, so it doubles as the fallback
    /// payment link when the gateway cannot be reached.
    pub fn fallback_link(&self, doc_id: &str) -> String {
        format!("{}/pay/{}/debt/{doc_id}", self.config.base_url, self.config.merchant)
    }

    /// Registers a debt for the given order and returns the hosted payment URL.
    pub async fn register_debt(&self, order: &Order) -> Result<DebtRegistration, GatewayError> {
        let url = self.debts_url();
        let body = self.debt_body(order)?;
        trace!("🧾️ Registering debt for order {} at {url}", order.id);
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| GatewayError::RequestError(e.to_string()))?;
            return Err(GatewayError::QueryError { status, message });
        }
        let result = response.json::<Value>().await.map_err(|e| GatewayError::JsonError(e.to_string()))?;
        let pay_url = result["debt"]["payUrl"].as_str().map(String::from);
        if pay_url.is_none() {
            warn!("🧾️ Gateway accepted debt for order {} but returned no payUrl", order.id);
        }
        info!("🧾️ Registered debt for order {}", order.id);
        Ok(DebtRegistration { debt_id: order.id.to_string(), pay_url })
    }

    fn debt_body(&self, order: &Order) -> Result<Value, GatewayError> {
        let start = Utc::now();
        let end = start + Duration::days(self.config.debt_validity_days);
        let value = order.amount.value().checked_mul(self.config.fx_multiplier).ok_or_else(|| {
            GatewayError::InvalidAmount(format!(
                "{} with multiplier {} overflows",
                order.amount, self.config.fx_multiplier
            ))
        })?;
        Ok(json!({
            "debt": {
                "docId": order.id.as_str(),
                "label": order.product_name,
                "amount": {
                    "currency": self.config.currency,
                    "value": value.to_string(),
                },
                "validPeriod": {
                    "start": start.format(TIME_FORMAT).to_string(),
                    "end": end.format(TIME_FORMAT).to_string(),
                }
            }
        }))
    }
}
