// auth-backend/src/utils/session.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use uuid::Uuid;

/// セッショントークン関連のエラー
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to encode session token: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to decode session token: {0}")]
    DecodingError(String),

    #[error("Session has expired")]
    TokenExpired,

    #[error("Missing session secret key")]
    MissingSecretKey,

    #[error("Invalid session configuration: {0}")]
    ConfigurationError(String),
}

/// セッショントークンのClaims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (account ID)
    pub sub: String,
    pub email: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// JWT ID
    pub jti: String,
}

impl SessionClaims {
    pub fn account_id(&self) -> Result<Uuid, SessionError> {
        Uuid::parse_str(&self.sub).map_err(|e| SessionError::DecodingError(e.to_string()))
    }
}

/// セッション設定
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 署名用の秘密鍵
    pub secret_key: String,
    /// 有効期限（分）
    pub expiry_minutes: i64,
    /// 発行者
    pub issuer: String,
    /// 対象者
    pub audience: String,
}

impl SessionConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, SessionError> {
        let secret_key = env::var("JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET_KEY"))
            .map_err(|_| SessionError::MissingSecretKey)?;

        let expiry_minutes = env::var("SESSION_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "120".to_string())
            .parse()
            .map_err(|_| SessionError::ConfigurationError("Invalid session expiry".to_string()))?;

        Ok(Self {
            secret_key,
            expiry_minutes,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "auth-backend".to_string()),
            audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "auth-backend-users".to_string()),
        })
    }

    pub fn for_testing() -> Self {
        Self {
            secret_key: "test-secret-key-that-is-at-least-32-characters-long".to_string(),
            expiry_minutes: 120,
            issuer: "auth-backend".to_string(),
            audience: "auth-backend-users".to_string(),
        }
    }

    /// 秘密鍵の検証
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.secret_key.len() < 32 {
            return Err(SessionError::ConfigurationError(
                "Session secret key must be at least 32 characters".to_string(),
            ));
        }

        if self.expiry_minutes <= 0 {
            return Err(SessionError::ConfigurationError(
                "Session expiry must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// セッショントークン管理
pub struct SessionManager {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// セッションの有効期限（秒）
    pub fn expiry_seconds(&self) -> i64 {
        self.config.expiry_minutes * 60
    }

    /// セッショントークンを発行
    pub fn issue(&self, account_id: Uuid, email: &str) -> Result<String, SessionError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.expiry_minutes);

        let claims = SessionClaims {
            sub: account_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(SessionError::EncodingError)
    }

    /// セッショントークンを検証・デコード
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::TokenExpired,
                _ => SessionError::DecodingError(e.to_string()),
            })
    }
}
