// auth-backend/src/api/handlers/mod.rs
use super::CookieConfig;
use axum_extra::extract::cookie::{Cookie, SameSite};

pub mod auth_handler;
pub mod page_handler;
pub mod system_handler;

/// セッションCookieを作成
pub(crate) fn session_cookie(
    config: &CookieConfig,
    token: String,
    max_age_seconds: i64,
) -> Cookie<'static> {
    Cookie::build((config.session_cookie_name.clone(), token))
        .path(config.path.clone())
        .secure(config.secure)
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_seconds))
        .build()
}

/// 次の1リクエストだけ表示するメッセージ
pub(crate) fn flash_cookie(config: &CookieConfig, message: &str) -> Cookie<'static> {
    Cookie::build((config.flash_cookie_name.clone(), message.to_string()))
        .path(config.path.clone())
        .secure(config.secure)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// 削除用Cookie（名前とパスが一致している必要がある）
pub(crate) fn removal_cookie(config: &CookieConfig, name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), String::new()))
        .path(config.path.clone())
        .build()
}
