use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use order_tracker_engine::{OrderApi, ReconcileApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::AdamsPayApi,
    routes::{configure_api, health},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let gateway = AdamsPayApi::new(config.adamspay.clone())
        .map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    let policy = config.reconcile_policy();
    let srv = HttpServer::new(move || {
        let orders_api = OrderApi::new(db.clone());
        let reconcile_api = ReconcileApi::new(db.clone(), policy);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ots::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(reconcile_api))
            .app_data(web::Data::new(gateway.clone()))
            .service(health)
            .service(web::scope("/api").configure(configure_api::<SqliteDatabase>))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
