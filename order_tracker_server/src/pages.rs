//! Minimal HTML pages for the user-facing payment redirect.
//!
//! The redirect target is the only endpoint a human ever sees, so it renders a small self-contained page rather than
//! JSON. Everything else on the server speaks JSON.

use order_tracker_engine::db_types::{Order, OrderStatus};

pub fn result_page(order: &Order) -> String {
    let (headline, detail) = match order.status {
        OrderStatus::Paid => ("Payment received", "Thank you! Your payment has been confirmed."),
        OrderStatus::Failed => ("Payment failed", "The payment was not completed. You can try again from your order."),
        OrderStatus::Pending => {
            ("Payment pending", "We have not received confirmation yet. This page will reflect the final status soon.")
        },
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{headline}</title></head>\n<body>\n\
         <h1>{headline}</h1>\n<p>{detail}</p>\n\
         <p>Order <code>{id}</code>: <strong>{status}</strong></p>\n\
         <p>{product} ({amount})</p>\n\
         </body>\n</html>\n",
        id = order.id,
        status = order.status,
        product = order.product_name,
        amount = order.amount,
    )
}

pub fn error_page(title: &str, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n\
         <h1>{title}</h1>\n<p>{message}</p>\n</body>\n</html>\n"
    )
}
