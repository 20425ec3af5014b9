//! Order Tracker Engine
//!
//! The engine contains the core logic for the order-and-payment-status tracker. It is transport-agnostic: the HTTP
//! server crate sits on top of it, and any backend that implements [`traits::OrderTrackerDatabase`] can act as the
//! order store.
//!
//! The library is divided into three main sections:
//! 1. Notification normalization ([`mod@notifications`]). Inbound gateway messages arrive in several shapes (webhook
//!    bodies, redirect query parameters, manual test triggers). They are sniffed exactly once, at the boundary, and
//!    turned into a normalized [`notifications::Notification`] record. Everything downstream works with that record.
//! 2. The public APIs ([`OrderApi`] and [`ReconcileApi`]). The reconciler resolves the target order, compares the
//!    derived status with the stored one, and applies the change at most once.
//! 3. Database management ([`SqliteDatabase`]). You should never need to access the database directly; use the APIs.
//!    The data types used in the database are defined in [`mod@db_types`] and are public.

pub mod db_types;
pub mod notifications;
pub mod traits;

mod api;
mod sqlite;

pub use api::{
    errors::{OrderApiError, ReconcileError},
    order_objects::{OrderResult, ReconcileAction, ReconcileOutcome, ReconcilePolicy},
    orders_api::OrderApi,
    reconcile_api::ReconcileApi,
};
pub use sqlite::{db_url, SqliteDatabase};
