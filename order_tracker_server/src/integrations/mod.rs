pub mod adamspay;

pub use adamspay::{AdamsPayApi, DebtRegistration, GatewayError};
