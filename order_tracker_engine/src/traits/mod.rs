mod order_tracker_database;

pub use order_tracker_database::{OrderTrackerDatabase, TrackerDbError};
