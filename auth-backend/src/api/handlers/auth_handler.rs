// auth-backend/src/api/handlers/auth_handler.rs
use super::session_cookie;
use crate::api::dto::auth_dto::*;
use crate::api::AppState;
use crate::domain::credential::Credential;
use crate::domain::user_model::SafeUser;
use crate::error::{AppError, AppResult};
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

/// ユーザー登録
pub async fn signup_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<Credential>,
) -> AppResult<impl IntoResponse> {
    info!(email = %payload.email, "User signup attempt");

    let signup_response = app_state.auth_service.signup(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(signup_response)),
    ))
}

/// ログイン（セッションCookieを発行）
pub async fn login_handler(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    info!(email = %payload.email, "User signin attempt");

    let login_response = app_state.auth_service.login(payload).await?;

    let max_age = app_state.auth_service.session_manager().expiry_seconds();
    let jar = jar.add(session_cookie(
        &app_state.cookie_config,
        login_response.session_token.clone(),
        max_age,
    ));

    Ok((jar, ApiResponse::success(login_response)))
}

/// 現在のユーザー情報
pub async fn me_handler(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<ApiResponse<SafeUser>> {
    let token = jar
        .get(&app_state.cookie_config.session_cookie_name)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::Unauthorized("Missing session".to_string()))?;

    let user = app_state.auth_service.current_user(&token).await?;
    Ok(ApiResponse::success(user))
}

pub fn auth_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/users", post(signup_handler))
        .route("/api/sessions", post(login_handler))
        .route("/api/me", get(me_handler))
        .with_state(app_state)
}
