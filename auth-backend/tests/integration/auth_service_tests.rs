// tests/integration/auth_service_tests.rs

use crate::common::app_helper::create_auth_service;
use crate::common::db::TestDatabase;
use crate::common::mock_account_store::MockAccountStore;
use crate::common::test_data::*;
use auth_backend::domain::credential::{CredentialError, CredentialField};
use async_trait::async_trait;
use auth_backend::domain::user_model;
use auth_backend::error::AppError;
use auth_backend::repository::account_store::{AccountStore, CreateUser};
use auth_backend::repository::user_repository::UserRepository;
use sea_orm::DbErr;
use std::sync::Arc;
use uuid::Uuid;

/// 事前の重複チェックを常にすり抜けるストア（同時登録の再現用）
struct StaleCheckStore {
    inner: UserRepository,
}

#[async_trait]
impl AccountStore for StaleCheckStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr> {
        self.inner.find_by_email(email).await
    }

    async fn is_email_taken(&self, _email: &str) -> Result<bool, DbErr> {
        Ok(false)
    }

    async fn create(&self, create_user: CreateUser) -> Result<user_model::Model, DbErr> {
        self.inner.create(create_user).await
    }
}

#[tokio::test]
async fn test_signup_stores_normalized_email() {
    let store = MockAccountStore::new();
    let service = create_auth_service(Arc::new(store.clone()));

    let response = service
        .signup(credential(" Somsak@Odds.Team ", VALID_PASSWORD, VALID_PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.user.email, "somsak@odds.team");
    assert_eq!(response.message, "Successfully!");
    assert_eq!(response.redirect_to, "/");
    assert!(store.get("somsak@odds.team").is_some());
}

#[tokio::test]
async fn test_signup_rejects_duplicate_without_writing() {
    let store = MockAccountStore::new();
    let service = create_auth_service(Arc::new(store.clone()));

    service
        .signup(credential(REGISTERED_EMAIL, VALID_PASSWORD, VALID_PASSWORD))
        .await
        .unwrap();

    let err = service
        .signup(credential(REGISTERED_EMAIL, VALID_PASSWORD, VALID_PASSWORD))
        .await
        .unwrap_err();

    match err {
        AppError::ValidationFailed(result) => {
            assert_eq!(
                result.get(CredentialField::Email),
                Some(&CredentialError::DuplicateEmail)
            );
            assert!(!result.has_error(CredentialField::Password));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_malformed_email_skips_duplicate_lookup() {
    let store = MockAccountStore::new();
    let service = create_auth_service(Arc::new(store));

    let result = service
        .validate_credential(&credential("somsakodds.team", VALID_PASSWORD, VALID_PASSWORD))
        .await
        .unwrap();

    assert_eq!(
        result.get(CredentialField::Email),
        Some(&CredentialError::MalformedEmail)
    );
    assert_eq!(result.errors().len(), 1);
}

#[tokio::test]
async fn test_login_and_current_user() {
    let store = MockAccountStore::new();
    let service = create_auth_service(Arc::new(store));

    service
        .signup(credential(ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_PASSWORD))
        .await
        .unwrap();

    let login = service
        .login(login(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .unwrap();
    assert_eq!(login.redirect_to, "/dashboard");
    assert!(!login.session_token.is_empty());

    let user = service.current_user(&login.session_token).await.unwrap();
    assert_eq!(user.email, ADMIN_EMAIL);
    assert_eq!(user.display_name, "Admin01");
}

#[tokio::test]
async fn test_login_failures_share_message() {
    let store = MockAccountStore::new();
    let service = create_auth_service(Arc::new(store));

    service
        .signup(credential(ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_PASSWORD))
        .await
        .unwrap();

    for request in [
        login(ADMIN_EMAIL, "Wrong-pass1!"),
        login("missing@odds.team", ADMIN_PASSWORD),
    ] {
        match service.login(request).await {
            Err(AppError::Unauthorized(message)) => {
                assert_eq!(message, "Invalid email or password")
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.redirect_to)),
        }
    }
}

#[tokio::test]
async fn test_current_user_rejects_garbage_token() {
    let service = create_auth_service(Arc::new(MockAccountStore::new()));

    let err = service.current_user("garbage").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_ensure_account_is_idempotent() {
    let store = MockAccountStore::new();
    let service = create_auth_service(Arc::new(store.clone()));

    assert!(service
        .ensure_account(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap());
    assert!(!service
        .ensure_account("ADMIN01@odds.team", ADMIN_PASSWORD)
        .await
        .unwrap());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_signup_against_database() {
    let db = TestDatabase::new().await;
    let repo = Arc::new(UserRepository::new(db.connection.clone()));
    let service = create_auth_service(repo.clone());

    service
        .signup(credential(REGISTERED_EMAIL, VALID_PASSWORD, VALID_PASSWORD))
        .await
        .unwrap();

    let err = service
        .signup(credential(REGISTERED_EMAIL, VALID_PASSWORD, VALID_PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_unique_violation_on_insert_is_reported_as_taken() {
    let db = TestDatabase::new().await;
    let repo = UserRepository::new(db.connection.clone());
    let service = create_auth_service(Arc::new(StaleCheckStore {
        inner: repo.clone(),
    }));

    service
        .signup(credential(REGISTERED_EMAIL, VALID_PASSWORD, VALID_PASSWORD))
        .await
        .unwrap();

    let err = service
        .signup(credential(REGISTERED_EMAIL, VALID_PASSWORD, VALID_PASSWORD))
        .await
        .unwrap_err();

    match err {
        AppError::ValidationFailed(result) => {
            assert_eq!(
                result.get(CredentialField::Email),
                Some(&CredentialError::DuplicateEmail)
            );
            assert_eq!(result.errors().len(), 1);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(repo.count().await.unwrap(), 1);
}
