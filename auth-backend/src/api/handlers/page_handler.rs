// auth-backend/src/api/handlers/page_handler.rs

//! ブラウザ向けのフォーム画面
//!
//! 失敗時は同じURLで 422 とフォームを返し、成功時は 303 でリダイレクトする。

use super::{flash_cookie, removal_cookie, session_cookie};
use crate::api::dto::auth_dto::{LoginRequest, SIGNUP_NOTICE};
use crate::api::views;
use crate::api::AppState;
use crate::domain::credential::{Credential, ValidationResult};
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::logging::RequestContext;
use axum::{
    extract::{Extension, Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

/// トップページ（フラッシュメッセージを表示して消す）
pub async fn home_handler(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let flash_name = &app_state.cookie_config.flash_cookie_name;
    let flash = jar.get(flash_name).map(|c| c.value().to_string());

    let page = views::home_page(flash.as_deref())?;

    let jar = if flash.is_some() {
        jar.remove(removal_cookie(&app_state.cookie_config, flash_name))
    } else {
        jar
    };

    Ok((jar, page))
}

pub async fn sign_up_form_handler() -> AppResult<impl IntoResponse> {
    views::sign_up_page("", &ValidationResult::new())
}

/// サインアップ送信
pub async fn sign_up_handler(
    State(app_state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    jar: CookieJar,
    Form(credential): Form<Credential>,
) -> AppResult<Response> {
    let submitted_email = credential.email.clone();

    match app_state.auth_service.signup(credential).await {
        Ok(signup) => {
            log_with_context!(
                tracing::Level::INFO,
                "Sign-up completed",
                "request_id" => &context.request_id,
                "user_id" => signup.user.id,
            );
            let jar = jar.add(flash_cookie(&app_state.cookie_config, SIGNUP_NOTICE));
            Ok((jar, Redirect::to(&signup.redirect_to)).into_response())
        }
        Err(AppError::ValidationFailed(errors)) => {
            log_with_context!(
                tracing::Level::WARN,
                "Sign-up form rejected",
                "request_id" => &context.request_id,
                "email" => &submitted_email,
                "errors" => errors.to_string(),
            );
            let page = views::sign_up_page(&submitted_email, &errors)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn login_form_handler() -> AppResult<impl IntoResponse> {
    views::login_page("", &ValidationResult::new(), None)
}

/// ログイン送信
pub async fn login_handler(
    State(app_state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    jar: CookieJar,
    Form(request): Form<LoginRequest>,
) -> AppResult<Response> {
    let submitted_email = request.email.clone();

    match app_state.auth_service.login(request).await {
        Ok(login) => {
            let max_age = app_state.auth_service.session_manager().expiry_seconds();
            let jar = jar.add(session_cookie(
                &app_state.cookie_config,
                login.session_token,
                max_age,
            ));
            Ok((jar, Redirect::to(&login.redirect_to)).into_response())
        }
        Err(AppError::ValidationFailed(errors)) => {
            log_with_context!(
                tracing::Level::WARN,
                "Login form incomplete",
                "request_id" => &context.request_id,
                "errors" => errors.to_string(),
            );
            let page = views::login_page(&submitted_email, &errors, None)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(AppError::Unauthorized(message)) => {
            log_with_context!(
                tracing::Level::WARN,
                "Login rejected",
                "request_id" => &context.request_id,
                "email" => &submitted_email,
            );
            let page = views::login_page(&submitted_email, &ValidationResult::new(), Some(&message))?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(e),
    }
}

/// ログイン後のダッシュボード
pub async fn dashboard_handler(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Response> {
    let session_name = &app_state.cookie_config.session_cookie_name;

    let Some(token) = jar.get(session_name).map(|c| c.value().to_string()) else {
        return Ok(Redirect::to("/login").into_response());
    };

    match app_state.auth_service.current_user(&token).await {
        Ok(user) => {
            let page = views::dashboard_page(&user.display_name, &user.email)?;
            Ok(page.into_response())
        }
        Err(AppError::Unauthorized(_)) => {
            warn!("Dashboard access with invalid session");
            let jar = jar.remove(removal_cookie(&app_state.cookie_config, session_name));
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(e) => Err(e),
    }
}

/// ログアウト
pub async fn logout_handler(State(app_state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let session_name = &app_state.cookie_config.session_cookie_name;
    let jar = jar.remove(removal_cookie(&app_state.cookie_config, session_name));

    info!("User signed out");
    (jar, Redirect::to("/login"))
}

pub fn page_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/users/sign_up", get(sign_up_form_handler).post(sign_up_handler))
        .route("/login", get(login_form_handler).post(login_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/logout", post(logout_handler))
        .with_state(app_state)
}
