// src/repository/user_repository.rs

use super::account_store::{AccountStore, CreateUser};
use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use async_trait::async_trait;
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, PaginatorTrait, QueryFilter, Set, SqlErr};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DbConn,
}

impl UserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 登録済みアカウント数
    pub async fn count(&self) -> Result<u64, DbErr> {
        UserEntity::find().count(&self.db).await
    }
}

#[async_trait]
impl AccountStore for UserRepository {
    /// ユーザーをIDで検索
    async fn find_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find_by_id(id).one(&self.db).await
    }

    /// ユーザーをメールアドレスで検索
    async fn find_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// メールアドレスの重複チェック
    async fn is_email_taken(&self, email: &str) -> Result<bool, DbErr> {
        let count = UserEntity::find()
            .filter(user_model::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// ユーザーを作成
    async fn create(&self, create_user: CreateUser) -> Result<user_model::Model, DbErr> {
        let new_user = UserActiveModel {
            email: Set(create_user.email),
            password_hash: Set(create_user.password_hash),
            ..ActiveModelBehavior::new()
        };

        new_user.insert(&self.db).await
    }
}

/// 一意制約違反かどうか
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
