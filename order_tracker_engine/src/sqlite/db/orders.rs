use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{NewOrder, Order, OrderId, OrderStatus};

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
///
/// New orders are stored with the table's default status (PENDING) and no payment link.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                id,
                product_name,
                amount
            ) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.product_name)
    .bind(order.amount)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

pub async fn fetch_order_by_id(id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Moves the order to `status` in a single guarded UPDATE.
///
/// The statement only writes when the stored status differs from the new one, and, when `only_from` is given, when
/// the stored status matches it. `None` means the guard refused the write, or the order does not exist.
pub async fn update_order_status(
    id: &OrderId,
    status: OrderStatus,
    only_from: Option<OrderStatus>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    trace!("🗃️ Updating order {id} to {status} (only_from: {only_from:?})");
    let order = match only_from {
        Some(from) => {
            sqlx::query_as(
                r#"
                    UPDATE orders
                    SET status = $1, updated_at = CURRENT_TIMESTAMP
                    WHERE id = $2 AND status <> $1 AND status = $3
                    RETURNING *;
                "#,
            )
            .bind(status)
            .bind(id.as_str())
            .bind(from)
            .fetch_optional(conn)
            .await?
        },
        None => {
            sqlx::query_as(
                r#"
                    UPDATE orders
                    SET status = $1, updated_at = CURRENT_TIMESTAMP
                    WHERE id = $2 AND status <> $1
                    RETURNING *;
                "#,
            )
            .bind(status)
            .bind(id.as_str())
            .fetch_optional(conn)
            .await?
        },
    };
    Ok(order)
}

pub async fn set_payment_link(
    id: &OrderId,
    link: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders
            SET payment_link = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING *;
        "#,
    )
    .bind(link)
    .bind(id.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
