// src/main.rs
use auth_backend::api::{app_router, AppState, CookieConfig};
use auth_backend::config::AppConfig;
use auth_backend::db::{create_db_pool, run_migrations};
use auth_backend::log_with_context;
use auth_backend::logging::init_tracing;
use auth_backend::repository::user_repository::UserRepository;
use auth_backend::service::auth_service::AuthService;
use auth_backend::utils::password::PasswordManager;
use auth_backend::utils::session::SessionManager;
use auth_backend::utils::validation::CredentialValidator;
use axum::http::{HeaderValue, Method};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    init_tracing();

    tracing::info!("Starting Auth Backend server...");

    // 設定を読み込む
    let app_config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded: {:?}", app_config);

    // データベース接続を作成しマイグレーションを適用
    let db_pool = create_db_pool(&app_config).await?;
    run_migrations(&db_pool).await?;
    tracing::info!("Database pool created and migrations applied.");

    // サービスの作成
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let password_manager = Arc::new(PasswordManager::new(app_config.argon2.clone())?);
    let session_manager = Arc::new(SessionManager::new(app_config.session.clone())?);
    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        CredentialValidator::new(app_config.credential_policy.clone()),
        password_manager,
        session_manager,
    ));

    // シードアカウント
    if let Some(seed) = &app_config.seed_account {
        match auth_service.ensure_account(&seed.email, &seed.password).await {
            Ok(true) => log_with_context!(
                tracing::Level::INFO,
                "Seed account created",
                "email" => &seed.email,
            ),
            Ok(false) => log_with_context!(
                tracing::Level::DEBUG,
                "Seed account already exists",
                "email" => &seed.email,
            ),
            Err(e) => {
                log_with_context!(
                    tracing::Level::ERROR,
                    "Failed to create seed account",
                    "email" => &seed.email,
                    "error" => e.to_string(),
                );
                return Err(e.into());
            }
        }
    }

    let account_count = user_repo.count().await?;
    tracing::info!(account_count, "Account store ready");

    // ルーターの設定
    let app_state = AppState::new(auth_service, CookieConfig::from_app_config(&app_config));
    let router = app_router(app_state).layer(cors_layer(&app_config.cors_allowed_origins));

    // サーバーの起動
    let server_addr = app_config.server_addr();
    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
