// auth-backend/src/api/mod.rs
use crate::config::AppConfig;
use crate::logging::{inject_request_context, logging_middleware};
use crate::service::auth_service::AuthService;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;
pub mod views;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub cookie_config: CookieConfig,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, cookie_config: CookieConfig) -> Self {
        Self {
            auth_service,
            cookie_config,
        }
    }
}

/// Cookie設定
#[derive(Clone, Debug)]
pub struct CookieConfig {
    pub session_cookie_name: String,
    pub flash_cookie_name: String,
    pub secure: bool,
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "session".to_string(),
            flash_cookie_name: "flash".to_string(),
            secure: false,
            path: "/".to_string(),
        }
    }
}

impl CookieConfig {
    pub fn from_app_config(app_config: &AppConfig) -> Self {
        Self {
            secure: app_config.security.cookie_secure,
            ..Self::default()
        }
    }
}

/// 全ルートをまとめたルーター
pub fn app_router(app_state: AppState) -> Router {
    Router::new()
        .merge(handlers::page_handler::page_router(app_state.clone()))
        .merge(handlers::auth_handler::auth_router(app_state))
        .merge(handlers::system_handler::system_router())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(inject_request_context))
        .layer(TraceLayer::new_for_http())
}
