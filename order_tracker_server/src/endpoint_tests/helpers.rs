use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use log::debug;
use serde_json::Value;

pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    let req = TestRequest::get().uri(path).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making GET request to {path}");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub async fn post_raw(
    path: &str,
    body: &'static str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::post()
        .uri(path)
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body)
        .to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making raw POST request to {path}");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub async fn post_request(
    path: &str,
    body: Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making POST request to {path}");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
