//! # セッション管理
//!
//! Redis を使用したセッション管理を提供する。
//!
//! ## Redis キー設計
//!
//! | キー | 値 | TTL |
//! |-----|-----|-----|
//! | `session:{session_id}` | SessionData (JSON) | 28800秒（8時間） |
//!
//! 延長はしない。TTL 経過かサインアウトで消える。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, aio::ConnectionManager};
use recipebox_domain::user::{Email, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::InfraError;

/// セッションの有効期限（秒）
pub const SESSION_TTL_SECONDS: u64 = 8 * 60 * 60;

/// セッションデータ
///
/// Redis に JSON 形式で保存されるセッション情報。
/// マジックリンクでのサインイン成功時に作成される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    user_id:          UserId,
    email:            Email,
    created_at:       DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
}

impl SessionData {
    /// `created_at` と `last_accessed_at` は `now` で初期化される。
    pub fn new(user_id: UserId, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email,
            created_at: now,
            last_accessed_at: now,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.last_accessed_at
    }
}

/// セッション管理トレイト
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// セッションを作成し、セッション ID（UUID v4）を返す
    async fn create(&self, data: &SessionData) -> Result<String, InfraError>;

    /// セッションを取得する
    ///
    /// 存在しない・期限切れの場合は `Ok(None)`。
    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError>;

    /// セッションを削除する
    ///
    /// 存在しないセッションを削除しても成功とする。
    async fn delete(&self, session_id: &str) -> Result<(), InfraError>;

    /// セッションの TTL（残り秒数）を取得する
    async fn get_ttl(&self, session_id: &str) -> Result<Option<i64>, InfraError>;
}

/// Redis を使用したセッションマネージャ
#[derive(Clone)]
pub struct RedisSessionManager {
    conn: ConnectionManager,
}

impl RedisSessionManager {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn session_key(session_id: &str) -> String {
        format!("session:{session_id}")
    }
}

#[async_trait]
impl SessionManager for RedisSessionManager {
    #[tracing::instrument(skip_all, fields(user_id = %data.user_id()))]
    async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
        // v4 は暗号論的乱数で、推測不能なセッション ID になる
        let session_id = Uuid::new_v4().to_string();
        let key = Self::session_key(&session_id);
        let json = serde_json::to_string(data)?;

        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(&key, json, SESSION_TTL_SECONDS).await?;

        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
        let key = Self::session_key(session_id);
        let mut conn = self.conn.clone();

        let result: Option<String> = conn.get(&key).await?;

        result
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(InfraError::from)
    }

    async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
        let key = Self::session_key(session_id);
        let mut conn = self.conn.clone();
        let _: () = conn.del(&key).await?;
        Ok(())
    }

    async fn get_ttl(&self, session_id: &str) -> Result<Option<i64>, InfraError> {
        let key = Self::session_key(session_id);
        let mut conn = self.conn.clone();

        let ttl: i64 = conn.ttl(&key).await?;

        // -2: キーなし、-1: TTL なし
        if ttl < 0 { Ok(None) } else { Ok(Some(ttl)) }
    }
}
