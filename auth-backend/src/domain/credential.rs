// auth-backend/src/domain/credential.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// サインアップ時に送信される認証情報
///
/// 欠けているフィールドは空文字として扱い、バリデーションで空欄エラーにする。
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credential {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl Credential {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            password_confirmation: password_confirmation.into(),
        }
    }

    /// メールアドレスの前後空白を除去し小文字化する（パスワードはそのまま）
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self
    }
}

// パスワードはログに出さない
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirmation", &"[REDACTED]")
            .finish()
    }
}

/// メールアドレスの正規化
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 検証対象のフィールド
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialField {
    Email,
    Password,
    PasswordConfirmation,
}

impl CredentialField {
    pub const ALL: [CredentialField; 3] = [
        CredentialField::Email,
        CredentialField::Password,
        CredentialField::PasswordConfirmation,
    ];

    /// フォームやJSONで使うフィールド名
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialField::Email => "email",
            CredentialField::Password => "password",
            CredentialField::PasswordConfirmation => "password_confirmation",
        }
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 認証情報のバリデーションエラー
///
/// `Display` の文字列はそのまま利用者に表示されるため変更しないこと。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("can't be blank")]
    BlankField,

    #[error("is invalid")]
    MalformedEmail,

    #[error("has already been taken")]
    DuplicateEmail,

    #[error("is too short (minimum is {minimum} characters)")]
    TooShort { minimum: usize },

    /// 文言は固定。`PASSWORD_MIN_LENGTH` を変えても "8 characters" のまま
    #[error("must be at least 8 characters long and include at least one uppercase letter, one lowercase letter, one digit, and one special character (!@#$%^&*)")]
    ComplexityViolation,

    #[error("doesn't match Password")]
    ConfirmationMismatch,
}

/// フィールド単位のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: CredentialField,
    pub error: CredentialError,
}

impl FieldError {
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// 1回の送信に対する検証結果
///
/// フィールドごとに最初に失敗したルールのみ保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーを追加する。既にそのフィールドにエラーがあれば無視して `false` を返す
    pub fn add(&mut self, field: CredentialField, error: CredentialError) -> bool {
        if self.has_error(field) {
            return false;
        }
        self.errors.push(FieldError { field, error });
        true
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, field: CredentialField) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn get(&self, field: CredentialField) -> Option<&CredentialError> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.error)
    }

    pub fn message_for(&self, field: CredentialField) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `{"email": ["can't be blank"], ...}` 形式に変換
    pub fn to_field_messages(&self) -> BTreeMap<String, Vec<String>> {
        let mut map = BTreeMap::new();
        for error in &self.errors {
            map.entry(error.field.as_str().to_string())
                .or_insert_with(Vec::new)
                .push(error.message());
        }
        map
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{} {}", e.field, e.error))
            .collect();
        f.write_str(&parts.join(", "))
    }
}
