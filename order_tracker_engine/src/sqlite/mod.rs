//! SQLite backend for the order tracker.
mod sqlite_impl;

pub mod db;
pub use db::db_url;
pub use sqlite_impl::SqliteDatabase;
