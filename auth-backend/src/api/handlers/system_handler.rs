// auth-backend/src/api/handlers/system_handler.rs
use crate::api::dto::auth_dto::HealthResponse;
use axum::{routing::get, Json, Router};

/// ヘルスチェック
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub fn system_router() -> Router {
    Router::new().route("/health", get(health_handler))
}
