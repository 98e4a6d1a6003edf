use axum::{
    Json, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::post,
};
use db::models::order::Order;
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub access_code: String,
}

/// Access-code login. An unknown code is indistinguishable from a wrong one.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<ApiResponse<Order>>, ApiError> {
    let access_code = payload.access_code.trim();
    if access_code.is_empty() {
        return Err(ApiError::BadRequest("Access code is required".to_string()));
    }

    let order = state
        .store()
        .get_by_access_code(access_code)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    tracing::debug!(order_id = order.id, "Access code accepted");
    Ok(ResponseJson(ApiResponse::success(order)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
