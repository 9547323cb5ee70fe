// auth-backend/src/utils/validation.rs

//! 認証情報のバリデーションルール
//!
//! フィールドごとに独立して評価し、各フィールドでは最初に失敗したルールのみ報告する。
//! メールアドレスの重複チェックはアカウントストアが必要なためサービス層で行う。

use crate::domain::credential::{Credential, CredentialError, CredentialField, ValidationResult};
use std::env;
use validator::ValidateEmail;

/// パスワードに必要な特殊文字
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*";

/// パスワードの最小文字数
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 8;

/// 認証情報のポリシー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPolicy {
    /// 最小文字数（文字単位）
    pub password_min_length: usize,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            password_min_length: DEFAULT_PASSWORD_MIN_LENGTH,
        }
    }
}

impl CredentialPolicy {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Self {
        let password_min_length = env::var("PASSWORD_MIN_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PASSWORD_MIN_LENGTH);

        Self {
            password_min_length,
        }
    }
}

/// 認証情報バリデーター
#[derive(Debug, Clone, Default)]
pub struct CredentialValidator {
    policy: CredentialPolicy,
}

impl CredentialValidator {
    pub fn new(policy: CredentialPolicy) -> Self {
        Self { policy }
    }

    /// 重複チェック以外の全ルールを評価する
    pub fn validate(&self, credential: &Credential) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Err(error) = self.check_email(&credential.email) {
            result.add(CredentialField::Email, error);
        }

        if let Err(error) = self.check_password(&credential.password) {
            result.add(CredentialField::Password, error);
        }

        if let Err(error) =
            check_confirmation(&credential.password, &credential.password_confirmation)
        {
            result.add(CredentialField::PasswordConfirmation, error);
        }

        result
    }

    /// 空欄 -> 形式 の順にチェック
    pub fn check_email(&self, email: &str) -> Result<(), CredentialError> {
        if is_blank(email) {
            return Err(CredentialError::BlankField);
        }
        if !email.trim().validate_email() {
            return Err(CredentialError::MalformedEmail);
        }
        Ok(())
    }

    /// 空欄 -> 長さ -> 複雑さ の順にチェック
    pub fn check_password(&self, password: &str) -> Result<(), CredentialError> {
        if is_blank(password) {
            return Err(CredentialError::BlankField);
        }

        // バイト数ではなく文字数で数える
        if password.chars().count() < self.policy.password_min_length {
            return Err(CredentialError::TooShort {
                minimum: self.policy.password_min_length,
            });
        }

        if !meets_complexity(password) {
            return Err(CredentialError::ComplexityViolation);
        }

        Ok(())
    }
}

/// 確認用パスワードは完全一致のみ許可
pub fn check_confirmation(password: &str, confirmation: &str) -> Result<(), CredentialError> {
    if password != confirmation {
        return Err(CredentialError::ConfirmationMismatch);
    }
    Ok(())
}

/// 大文字・小文字・数字・特殊文字をそれぞれ1文字以上含むか
pub fn meets_complexity(password: &str) -> bool {
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

    has_uppercase && has_lowercase && has_digit && has_special
}

/// 空白のみの値も空欄として扱う
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
