use std::env;

use log::*;
use order_tracker_engine::ReconcilePolicy;
use ot_common::Secret;

const DEFAULT_OT_HOST: &str = "127.0.0.1";
const DEFAULT_OT_PORT: u16 = 8460;
const DEFAULT_ADAMSPAY_BASE_URL: &str = "https://staging.adamspay.com";
const DEFAULT_MERCHANT: &str = "onofre";
const DEFAULT_DEBT_VALIDITY_DAYS: i64 = 2;
const DEFAULT_CURRENCY: &str = "PYG";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// When true, orders never leave a terminal state (PAID/FAILED); late or out-of-order notifications that would
    /// regress an order are refused. When false (the default), the last notification to arrive wins.
    pub forward_only: bool,
    pub adamspay: AdamsPayConfig,
}

#[derive(Clone, Debug, Default)]
pub struct AdamsPayConfig {
    pub base_url: String,
    /// The merchant API key. When empty, the server runs in simulation mode: no gateway calls are made and orders
    /// get a locally-built fallback payment link.
    pub api_key: Secret<String>,
    /// The publicly reachable URL of the webhook endpoint, sent to the gateway with each debt.
    pub callback_url: String,
    pub merchant: String,
    /// The shared webhook secret. Carried for completeness; incoming webhook signatures are not verified.
    pub webhook_secret: Secret<String>,
    pub debt_validity_days: i64,
    /// Multiplier applied to order amounts before they are sent to the gateway, for stores that price in a
    /// different currency than the one the gateway charges in.
    pub fx_multiplier: i64,
    pub currency: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OT_HOST.to_string(),
            port: DEFAULT_OT_PORT,
            database_url: String::default(),
            forward_only: false,
            adamspay: AdamsPayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("OT_HOST").ok().unwrap_or_else(|| DEFAULT_OT_HOST.into());
        let port = env::var("OT_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for OT_PORT. {e} Using the default, {DEFAULT_OT_PORT}, instead."
                    );
                    DEFAULT_OT_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_OT_PORT);
        let database_url = env::var("OT_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ OT_DATABASE_URL is not set. Please set it to the URL for the order tracker database.");
            String::default()
        });
        let forward_only = env::var("OT_FORWARD_ONLY").map(|s| &s == "1" || &s == "true").unwrap_or(false);
        let adamspay = AdamsPayConfig::from_env_or_default();
        Self { host, port, database_url, forward_only, adamspay }
    }

    pub fn reconcile_policy(&self) -> ReconcilePolicy {
        if self.forward_only {
            ReconcilePolicy::ForwardOnly
        } else {
            ReconcilePolicy::LastWriteWins
        }
    }
}

impl AdamsPayConfig {
    pub fn from_env_or_default() -> Self {
        let base_url = env::var("ADAMSPAY_BASE_URL").unwrap_or_else(|_| {
            warn!("ADAMSPAY_BASE_URL not set, using {DEFAULT_ADAMSPAY_BASE_URL}");
            DEFAULT_ADAMSPAY_BASE_URL.to_string()
        });
        let base_url = base_url.trim_end_matches('/').to_string();
        let api_key = env::var("ADAMSPAY_API_KEY").unwrap_or_else(|_| {
            warn!("🪛️ ADAMSPAY_API_KEY is not set. The server will run in simulation mode and never call the gateway.");
            String::default()
        });
        let api_key = Secret::new(api_key);
        let callback_url = env::var("ADAMSPAY_CALLBACK_URL").unwrap_or_else(|_| {
            warn!("ADAMSPAY_CALLBACK_URL not set. The gateway will fall back to its configured webhook URL.");
            String::default()
        });
        let merchant = env::var("ADAMSPAY_MERCHANT").unwrap_or_else(|_| {
            warn!("ADAMSPAY_MERCHANT not set, using {DEFAULT_MERCHANT}");
            DEFAULT_MERCHANT.to_string()
        });
        let webhook_secret = Secret::new(env::var("ADAMSPAY_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("🪛️ ADAMSPAY_WEBHOOK_SECRET is not set. Note that webhook signatures are not verified either way.");
            String::default()
        }));
        let debt_validity_days = env::var("ADAMSPAY_DEBT_VALIDITY_DAYS")
            .ok()
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| {
                        error!("🪛️ {s} is not a valid value for ADAMSPAY_DEBT_VALIDITY_DAYS. {e}");
                    })
                    .ok()
            })
            .unwrap_or(DEFAULT_DEBT_VALIDITY_DAYS);
        let fx_multiplier = env::var("ADAMSPAY_FX_MULTIPLIER")
            .ok()
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| {
                        error!("🪛️ {s} is not a valid value for ADAMSPAY_FX_MULTIPLIER. {e}");
                    })
                    .ok()
            })
            .unwrap_or(1);
        let currency = env::var("ADAMSPAY_CURRENCY").unwrap_or_else(|_| DEFAULT_CURRENCY.to_string());
        Self { base_url, api_key, callback_url, merchant, webhook_secret, debt_validity_days, fx_multiplier, currency }
    }
}
