// src/repository/account_store.rs

use crate::domain::user_model;
use async_trait::async_trait;
use sea_orm::DbErr;
use uuid::Uuid;

/// 新規アカウントの作成データ
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
}

/// アカウントの永続化先
///
/// 本番は `UserRepository`、テストではインメモリ実装に差し替える。
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr>;

    async fn find_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr>;

    async fn is_email_taken(&self, email: &str) -> Result<bool, DbErr>;

    /// 既存メールアドレスの場合は一意制約違反の `DbErr` を返す
    async fn create(&self, create_user: CreateUser) -> Result<user_model::Model, DbErr>;
}
