// auth-backend/src/api/dto/auth_dto.rs

use crate::domain::user_model::SafeUser;
use serde::{Deserialize, Serialize};
use std::fmt;

/// サインアップ成功時のフラッシュメッセージ
pub const SIGNUP_NOTICE: &str = "Successfully!";

/// ログイン失敗時のメッセージ（存在しないメールと誤パスワードを区別しない）
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password";

/// サインアップ後の遷移先
pub const SIGNUP_REDIRECT: &str = "/";

/// ログイン後の遷移先
pub const LOGIN_REDIRECT: &str = "/dashboard";

// --- リクエストDTO ---

// サインアップは domain::credential::Credential をそのまま受け取る

/// ログインリクエスト
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// --- レスポンスDTO ---

/// サインアップレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub user: SafeUser,
    pub message: String,
    pub redirect_to: String,
}

/// ログインレスポンス
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user: SafeUser,
    pub redirect_to: String,
    /// Cookie で返すのでボディには含めない
    #[serde(skip)]
    pub session_token: String,
}

/// ヘルスチェックレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
