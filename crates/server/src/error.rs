use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::{DbErr, models::order::OrderError};
use services::services::{
    export::ExportError, generation::GenerationError, orders::OrderServiceError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    OrderService(#[from] OrderServiceError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Order(err) => match err {
                OrderError::NotFound => (StatusCode::NOT_FOUND, "OrderError"),
                OrderError::DuplicateAccessCode | OrderError::DuplicateEtsyOrderId => {
                    (StatusCode::CONFLICT, "OrderError")
                }
                OrderError::Details(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "OrderError"),
            },
            ApiError::OrderService(err) => match err {
                OrderServiceError::Order(OrderError::NotFound) => {
                    (StatusCode::NOT_FOUND, "OrderError")
                }
                OrderServiceError::InvalidField { .. } | OrderServiceError::UnknownField(_) => {
                    (StatusCode::BAD_REQUEST, "ValidationError")
                }
                OrderServiceError::Order(OrderError::Details(_)) => {
                    (StatusCode::BAD_REQUEST, "ValidationError")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "OrderError"),
            },
            ApiError::Generation(err) => match err {
                GenerationError::Order(OrderError::NotFound) => {
                    (StatusCode::NOT_FOUND, "OrderError")
                }
                GenerationError::DetailsMissing => {
                    (StatusCode::PRECONDITION_FAILED, "GenerationError")
                }
                GenerationError::Upstream(_) | GenerationError::InvalidResponse(_) => {
                    (StatusCode::BAD_GATEWAY, "GenerationError")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "GenerationError"),
            },
            ApiError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ExportError"),
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "DatabaseError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            },
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        let error_message = match &self {
            // One message for any unknown code, so callers cannot probe
            // which access codes exist.
            ApiError::Unauthorized => "Invalid access code".to_string(),
            _ => format!("{}: {}", error_type, self),
        };

        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
