use crate::utils::password::Argon2Config;
use crate::utils::session::SessionConfig;
use crate::utils::validation::{CredentialPolicy, DEFAULT_PASSWORD_MIN_LENGTH};
use dotenvy::dotenv;
use std::env;
use std::fmt;

#[derive(Clone, Debug)]
pub struct SecurityConfig {
    pub cookie_secure: bool,
}

/// 起動時に作成するアカウント
#[derive(Clone)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedAccount")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub database_url: String,
    pub security: SecurityConfig,
    pub session: SessionConfig,
    pub argon2: Argon2Config,
    pub credential_policy: CredentialPolicy,
    pub seed_account: Option<SeedAccount>,
}

// 秘密鍵やDB接続文字列はログに出さない
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("environment", &self.environment)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("security", &self.security)
            .field("session_expiry_minutes", &self.session.expiry_minutes)
            .field("argon2", &self.argon2)
            .field("credential_policy", &self.credential_policy)
            .field("seed_account", &self.seed_account)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production";

        let credential_policy = CredentialPolicy::from_env();
        if is_production && credential_policy.password_min_length < DEFAULT_PASSWORD_MIN_LENGTH {
            return Err(format!(
                "PASSWORD_MIN_LENGTH must be at least {} in production",
                DEFAULT_PASSWORD_MIN_LENGTH
            ));
        }

        let session = SessionConfig::from_env().map_err(|e| e.to_string())?;
        session.validate().map_err(|e| e.to_string())?;

        let seed_account = match (
            env::var("SEED_ACCOUNT_EMAIL").ok(),
            env::var("SEED_ACCOUNT_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(SeedAccount { email, password }),
            (None, None) => None,
            _ => {
                return Err(
                    "SEED_ACCOUNT_EMAIL and SEED_ACCOUNT_PASSWORD must be set together".to_string(),
                )
            }
        };

        Ok(Self {
            environment,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| "Invalid PORT value")?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            security: SecurityConfig {
                cookie_secure: is_production,
            },
            session,
            argon2: Argon2Config::from_env(),
            credential_policy,
            seed_account,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// テスト用の設定を作成
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite::memory:".to_string()),
            security: SecurityConfig {
                cookie_secure: false,
            },
            session: SessionConfig::for_testing(),
            argon2: Argon2Config::for_testing(),
            credential_policy: CredentialPolicy::default(),
            seed_account: None,
        }
    }
}
