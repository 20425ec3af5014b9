use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use order_tracker_engine::{OrderApiError, ReconcileError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Could not reconcile the payment notification. {0}")]
    ReconcileFailed(#[from] ReconcileError),
    #[error("Order error. {0}")]
    OrderError(#[from] OrderApiError),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::ReconcileFailed(e) => match e {
                ReconcileError::MissingIdentifier => StatusCode::BAD_REQUEST,
                ReconcileError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
                ReconcileError::UnrecognizedPayload(_) => StatusCode::BAD_REQUEST,
                ReconcileError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                ReconcileError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::OrderError(e) => match e {
                OrderApiError::InvalidOrder(_) => StatusCode::BAD_REQUEST,
                OrderApiError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                OrderApiError::OrderAlreadyExists(_) => StatusCode::CONFLICT,
                OrderApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}
