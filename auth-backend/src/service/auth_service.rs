// auth-backend/src/service/auth_service.rs
use crate::api::dto::auth_dto::*;
use crate::domain::credential::{
    normalize_email, Credential, CredentialError, CredentialField, ValidationResult,
};
use crate::domain::user_model::SafeUser;
use crate::error::{AppError, AppResult};
use crate::repository::account_store::{AccountStore, CreateUser};
use crate::repository::user_repository::is_unique_violation;
use crate::utils::password::PasswordManager;
use crate::utils::session::SessionManager;
use crate::utils::validation::{is_blank, CredentialValidator};
use std::sync::Arc;
use tracing::{info, warn};

/// 認証サービス
pub struct AuthService {
    account_store: Arc<dyn AccountStore>,
    validator: CredentialValidator,
    password_manager: Arc<PasswordManager>,
    session_manager: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(
        account_store: Arc<dyn AccountStore>,
        validator: CredentialValidator,
        password_manager: Arc<PasswordManager>,
        session_manager: Arc<SessionManager>,
    ) -> Self {
        Self {
            account_store,
            validator,
            password_manager,
            session_manager,
        }
    }

    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session_manager
    }

    // --- ユーザー登録・ログイン ---

    /// 認証情報を検証する（重複チェックを含む）
    pub async fn validate_credential(&self, credential: &Credential) -> AppResult<ValidationResult> {
        let mut result = self.validator.validate(credential);

        // 形式が正しいメールアドレスのみストアに問い合わせる
        if !result.has_error(CredentialField::Email)
            && self.account_store.is_email_taken(&credential.email).await?
        {
            result.add(CredentialField::Email, CredentialError::DuplicateEmail);
        }

        Ok(result)
    }

    /// ユーザー登録
    pub async fn signup(&self, credential: Credential) -> AppResult<SignupResponse> {
        let credential = credential.normalized();

        let result = self.validate_credential(&credential).await?;
        if !result.is_valid() {
            warn!(
                email = %credential.email,
                errors = %result,
                "Signup validation failed"
            );
            return Err(AppError::ValidationFailed(result));
        }

        // パスワードハッシュ化
        let password_hash = self.password_manager.hash_password(&credential.password)?;

        let create_user = CreateUser {
            email: credential.email.clone(),
            password_hash,
        };

        // 事前チェック後に同じメールアドレスが登録された場合も重複として扱う
        let user = self.account_store.create(create_user).await.map_err(|e| {
            if is_unique_violation(&e) {
                warn!(email = %credential.email, "Signup lost race on unique email");
                let mut result = ValidationResult::new();
                result.add(CredentialField::Email, CredentialError::DuplicateEmail);
                AppError::ValidationFailed(result)
            } else {
                AppError::DbErr(e)
            }
        })?;

        info!(
            user_id = %user.id,
            email = %user.email,
            "User registered successfully"
        );

        Ok(SignupResponse {
            user: user.into(),
            message: SIGNUP_NOTICE.to_string(),
            redirect_to: SIGNUP_REDIRECT.to_string(),
        })
    }

    /// ログイン
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let mut result = ValidationResult::new();
        if is_blank(&request.email) {
            result.add(CredentialField::Email, CredentialError::BlankField);
        }
        if is_blank(&request.password) {
            result.add(CredentialField::Password, CredentialError::BlankField);
        }
        if !result.is_valid() {
            return Err(AppError::ValidationFailed(result));
        }

        let email = normalize_email(&request.email);

        let user = self
            .account_store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, "Login attempt for unknown email");
                AppError::Unauthorized(INVALID_LOGIN_MESSAGE.to_string())
            })?;

        let is_valid = self
            .password_manager
            .verify_password(&request.password, &user.password_hash)?;

        if !is_valid {
            warn!(user_id = %user.id, "Login attempt with incorrect password");
            return Err(AppError::Unauthorized(INVALID_LOGIN_MESSAGE.to_string()));
        }

        let session_token = self.session_manager.issue(user.id, &user.email)?;

        info!(user_id = %user.id, email = %user.email, "User signed in successfully");

        Ok(LoginResponse {
            user: user.into(),
            redirect_to: LOGIN_REDIRECT.to_string(),
            session_token,
        })
    }

    /// セッショントークンから現在のユーザーを取得
    pub async fn current_user(&self, session_token: &str) -> AppResult<SafeUser> {
        let claims = self.session_manager.verify(session_token).map_err(|e| {
            warn!(error = %e, "Session verification failed");
            AppError::Unauthorized("Invalid session".to_string())
        })?;

        let account_id = claims
            .account_id()
            .map_err(|_| AppError::Unauthorized("Invalid session".to_string()))?;

        let user = self
            .account_store
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %account_id, "Session refers to missing account");
                AppError::Unauthorized("Invalid session".to_string())
            })?;

        Ok(user.into())
    }

    /// アカウントが無ければ作成する（起動時のシード用）
    ///
    /// 作成した場合は `true`
    pub async fn ensure_account(&self, email: &str, password: &str) -> AppResult<bool> {
        if self
            .account_store
            .is_email_taken(&normalize_email(email))
            .await?
        {
            return Ok(false);
        }

        self.signup(Credential::new(email, password, password))
            .await?;
        Ok(true)
    }
}
