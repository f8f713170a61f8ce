//! # UserRepository
//!
//! ユーザー情報の永続化を担当するリポジトリ。
//! ユーザーはマジックリンクでの初回サインイン時に作られる。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipebox_domain::user::{Email, User, UserId};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// メールアドレスでユーザーを検索し、いなければ作成する
    ///
    /// 同じアドレスで同時に呼ばれても 1 行しか作られない。
    async fn find_or_create_by_email(&self, email: &Email, now: DateTime<Utc>)
    -> Result<User, InfraError>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id:         Uuid,
    email:      String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = InfraError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(row.email).map_err(|e| InfraError::unexpected(e.to_string()))?;
        Ok(User::from_db(UserId::from_uuid(row.id), email, row.created_at))
    }
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_or_create_by_email(
        &self,
        email: &Email,
        now: DateTime<Utc>,
    ) -> Result<User, InfraError> {
        let id = UserId::new();
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(email.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }
}
