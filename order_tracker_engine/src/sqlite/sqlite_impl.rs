//! `SqliteDatabase` is a concrete implementation of the order tracker backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`OrderTrackerDatabase`] trait.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{new_pool, orders};
use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatus},
    traits::{OrderTrackerDatabase, TrackerDbError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object with a connection pool attached to the given database URL.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderTrackerDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, TrackerDbError> {
        let mut conn = self.pool.acquire().await?;
        let id = order.order_id.clone();
        // Uniqueness is enforced by the primary key, not a pre-check
        match orders::insert_order(order, &mut conn).await {
            Ok(order) => Ok(order),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(TrackerDbError::OrderAlreadyExists(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch_order_by_id(&self, id: &OrderId) -> Result<Option<Order>, TrackerDbError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(id, &mut conn).await?;
        Ok(order)
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        only_from: Option<OrderStatus>,
    ) -> Result<Option<Order>, TrackerDbError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_order_status(id, status, only_from, &mut conn).await?;
        Ok(order)
    }

    async fn set_payment_link(&self, id: &OrderId, link: &str) -> Result<Order, TrackerDbError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::set_payment_link(id, link, &mut conn).await?;
        order.ok_or_else(|| TrackerDbError::OrderNotFound(id.clone()))
    }

    async fn close(&mut self) -> Result<(), TrackerDbError> {
        self.pool.close().await;
        Ok(())
    }
}
