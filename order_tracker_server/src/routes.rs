//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause
//! the current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (I/O,
//! database calls, gateway calls) must be expressed as futures or asynchronous functions.

use actix_web::{get, http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use log::*;
use order_tracker_engine::{
    db_types::{NewOrder, OrderId},
    notifications::Notification,
    traits::OrderTrackerDatabase,
    OrderApi,
    OrderResult,
    ReconcileApi,
    ReconcileError,
    ReconcileOutcome,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    data_objects::{JsonResponse, NewOrderRequest, OrderCreatedResponse, ReconcileReport},
    errors::ServerError,
    integrations::AdamsPayApi,
    pages::{error_page, result_page},
};

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------   Order creation  ----------------------------------------------------
/// Creates a new order and registers the matching debt with the payment gateway.
///
/// The order is stored first; a gateway failure never loses the order. If the gateway cannot be reached (or the
/// server runs in simulation mode), the order gets a locally-built fallback payment link and the response carries a
/// warning.
pub async fn create_order<B: OrderTrackerDatabase>(
    body: web::Json<NewOrderRequest>,
    orders: web::Data<OrderApi<B>>,
    gateway: web::Data<AdamsPayApi>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    let new_order = NewOrder::new(request.product_name, request.amount);
    let order = orders.create_order(new_order).await?;
    let (link, warning) = if gateway.is_simulation() {
        debug!("🧾️ Simulation mode: issuing fallback link for order {}", order.id);
        (gateway.fallback_link(order.id.as_str()), None)
    } else {
        match gateway.register_debt(&order).await {
            Ok(registration) => {
                let link = registration.pay_url.unwrap_or_else(|| gateway.fallback_link(order.id.as_str()));
                (link, None)
            },
            Err(e) => {
                warn!("🧾️ Could not register debt for order {}. {e}", order.id);
                let warning = format!("The payment gateway could not be reached ({e}). A fallback link was issued.");
                (gateway.fallback_link(order.id.as_str()), Some(warning))
            },
        }
    };
    let order = orders.set_payment_link(&order.id, &link).await?;
    info!("🛍️ Order {} created with payment link", order.id);
    let response = OrderCreatedResponse { order, payment_link: link, warning };
    Ok(HttpResponse::Created().json(response))
}

//----------------------------------------    Order status   ----------------------------------------------------
pub async fn order_status<B: OrderTrackerDatabase>(
    path: web::Path<String>,
    orders: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = OrderId::try_from_str(&path.into_inner()).map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?;
    let order = orders.fetch_order(&id).await?;
    Ok(HttpResponse::Ok().json(OrderResult::from(order)))
}

//----------------------------------------  Payment webhook  ----------------------------------------------------
/// The webhook endpoint the gateway POSTs payment notifications to.
///
/// The payload is normalized and reconciled against the order store. A notification for an unknown order is reported
/// as 404 and never creates an order.
pub async fn adamspay_webhook<B: OrderTrackerDatabase>(
    req: HttpRequest,
    body: web::Json<Value>,
    reconciler: web::Data<ReconcileApi<B>>,
) -> HttpResponse {
    trace!("🔔️ Received webhook request: {}", req.uri());
    let payload = body.into_inner();
    let notification = match Notification::from_webhook(&payload) {
        Ok(n) => n,
        Err(e) => {
            warn!("🔔️ Could not normalize webhook payload. {e}");
            return reconcile_error_response(&e);
        },
    };
    match reconciler.reconcile(&notification).await {
        Ok(outcome) => {
            info!("🔔️ {}", outcome.report());
            HttpResponse::Ok().json(ReconcileReport::from(outcome))
        },
        Err(e) => {
            warn!("🔔️ Could not reconcile webhook for order {}. {e}", notification.order_id);
            reconcile_error_response(&e)
        },
    }
}

fn reconcile_error_response(e: &ReconcileError) -> HttpResponse {
    let status = match e {
        ReconcileError::MissingIdentifier |
        ReconcileError::InvalidIdentifier(_) |
        ReconcileError::UnrecognizedPayload(_) => StatusCode::BAD_REQUEST,
        ReconcileError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        ReconcileError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpResponse::build(status).json(JsonResponse::failure(e))
}

//----------------------------------------  Payment redirect ----------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectQuery {
    /// The gateway's name for the order id. Takes precedence over `order_id` when both are present.
    #[serde(rename = "externalId")]
    pub external_id: Option<String>,
    pub order_id: Option<String>,
    pub status: Option<String>,
}

/// The user-facing redirect target after a payment attempt. Renders HTML, since a human lands here.
///
/// The redirect is advisory: it updates the order like a webhook does, but its status vocabulary is smaller and the
/// definitive signal remains the webhook.
pub async fn payment_redirect<B: OrderTrackerDatabase>(
    query: web::Query<RedirectQuery>,
    reconciler: web::Data<ReconcileApi<B>>,
) -> HttpResponse {
    let query = query.into_inner();
    let raw_id = match query.external_id.as_deref().or(query.order_id.as_deref()) {
        Some(id) => id,
        None => {
            return HttpResponse::BadRequest()
                .content_type("text/html; charset=utf-8")
                .body(error_page("Missing order", "The return link did not include an order reference."));
        },
    };
    let notification = match Notification::from_redirect(raw_id, query.status.as_deref()) {
        Ok(n) => n,
        Err(e) => {
            warn!("💳️ Invalid payment redirect. {e}");
            return HttpResponse::BadRequest()
                .content_type("text/html; charset=utf-8")
                .body(error_page("Invalid order reference", &e.to_string()));
        },
    };
    match reconciler.reconcile(&notification).await {
        Ok(ReconcileOutcome { order, .. }) => {
            HttpResponse::Ok().content_type("text/html; charset=utf-8").body(result_page(&order))
        },
        Err(ReconcileError::OrderNotFound(id)) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(error_page("Order not found", &format!("No order with reference {id} exists."))),
        Err(e) => {
            error!("💳️ Could not reconcile payment redirect. {e}");
            HttpResponse::InternalServerError()
                .content_type("text/html; charset=utf-8")
                .body(error_page("Something went wrong", "The payment status could not be determined."))
        },
    }
}

//---------------------------------------- Manual test payment --------------------------------------------------
/// Simulates a successful payment webhook for the given order. The synthetic payload travels the same
/// parse-and-reconcile path as a live webhook.
pub async fn test_payment<B: OrderTrackerDatabase>(
    path: web::Path<String>,
    reconciler: web::Data<ReconcileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = OrderId::try_from_str(&path.into_inner()).map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?;
    info!("🔔️ Manual test payment triggered for order {id}");
    let outcome = reconciler.replay_paid(&id).await?;
    Ok(HttpResponse::Ok().json(ReconcileReport::from(outcome)))
}

//----------------------------------------  Route registration --------------------------------------------------
// Actix's route macros cannot handle generic handlers, so the /api routes are registered manually.
pub fn configure_api<B: OrderTrackerDatabase + 'static>(cfg: &mut web::ServiceConfig) {
    // An unparseable body gets the same JSON failure shape as every other rejected payload
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(JsonResponse::failure(&err));
        actix_web::error::InternalError::from_response(err, response).into()
    });
    cfg.app_data(json_config)
        .service(web::resource("/orders").route(web::post().to(create_order::<B>)))
        .service(web::resource("/orders/{id}").route(web::get().to(order_status::<B>)))
        .service(web::resource("/orders/{id}/test-payment").route(web::post().to(test_payment::<B>)))
        .service(web::resource("/adams/callback").route(web::post().to(adamspay_webhook::<B>)))
        .service(web::resource("/adams/return").route(web::get().to(payment_redirect::<B>)));
}
