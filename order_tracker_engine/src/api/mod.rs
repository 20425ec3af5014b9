pub mod errors;
pub mod order_objects;
pub mod orders_api;
pub mod reconcile_api;
