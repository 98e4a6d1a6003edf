use axum::{
    Extension, Json, Router,
    extract::State,
    http::header,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json as ResponseJson, Response},
    routing::{get, post},
};
use db::models::order::{Order, UpdateOrder};
use services::services::export::BUNDLE_FILE_NAME;
use utils::response::ApiResponse;

use crate::{error::ApiError, middleware::load_order_middleware, state::AppState};

pub async fn get_order(
    Extension(order): Extension<Order>,
) -> Result<ResponseJson<ApiResponse<Order>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(order)))
}

pub async fn update_order(
    Extension(existing_order): Extension<Order>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateOrder>,
) -> Result<ResponseJson<ApiResponse<Order>>, ApiError> {
    let order = state
        .orders()
        .update_order(state.store(), existing_order.id, payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(order)))
}

pub async fn generate_content(
    Extension(order): Extension<Order>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Order>>, ApiError> {
    let order = state.generation().generate(state.store(), order.id).await?;
    Ok(ResponseJson(ApiResponse::success(order)))
}

pub async fn download_site(
    Extension(order): Extension<Order>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let bytes = state.export().bundle(&order)?;
    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{BUNDLE_FILE_NAME}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/orders/{id}", get(get_order).put(update_order))
        .route("/orders/{id}/generate", post(generate_content))
        .route("/orders/{id}/download", get(download_site))
        .layer(from_fn_with_state(state.clone(), load_order_middleware))
}
