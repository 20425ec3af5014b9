//! # Order tracker server
//! This module hosts the HTTP surface for the order tracker. It is responsible for:
//! Accepting new orders and registering the matching debt with the payment gateway.
//! Listening for incoming payment webhooks and user-facing payment redirects.
//! Serving the current status of any order to polling clients.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/orders`: Create a new order (POST) or fetch one by id (GET /api/orders/{id}).
//! * `/api/adams/callback`: The webhook route for receiving payment notifications from the gateway.
//! * `/api/adams/return`: The user-facing redirect target after a payment attempt.
//! * `/api/orders/{id}/test-payment`: A manual trigger that simulates a successful payment webhook.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod pages;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
