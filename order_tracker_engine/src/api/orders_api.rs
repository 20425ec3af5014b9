use log::debug;

use crate::{
    api::errors::OrderApiError,
    db_types::{NewOrder, Order, OrderId},
    traits::OrderTrackerDatabase,
};

/// The public API for creating and fetching orders.
pub struct OrderApi<B> {
    db: B,
}

impl<B> OrderApi<B>
where B: OrderTrackerDatabase
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Validates and stores a new order. New orders always start out PENDING with no payment link.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        if order.product_name.trim().is_empty() {
            return Err(OrderApiError::InvalidOrder("product_name must not be empty".to_string()));
        }
        if !order.amount.is_positive() {
            return Err(OrderApiError::InvalidOrder(format!(
                "amount must be strictly positive, but was {}",
                order.amount
            )));
        }
        let order = self.db.insert_order(order).await?;
        debug!("🛍️ Created order {} for {} ({})", order.id, order.product_name, order.amount);
        Ok(order)
    }

    /// Fetches an order by id, failing with [`OrderApiError::OrderNotFound`] if it is absent.
    pub async fn fetch_order(&self, id: &OrderId) -> Result<Order, OrderApiError> {
        let order = self.db.fetch_order_by_id(id).await?;
        order.ok_or_else(|| OrderApiError::OrderNotFound(id.clone()))
    }

    /// Attaches the payment link obtained from the gateway to an existing order.
    pub async fn set_payment_link(&self, id: &OrderId, link: &str) -> Result<Order, OrderApiError> {
        let order = self.db.set_payment_link(id, link).await?;
        debug!("🛍️ Stored payment link for order {}", order.id);
        Ok(order)
    }
}
