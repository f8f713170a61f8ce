//! # マジックリンクトークン
//!
//! サインインメールに埋め込むワンタイムトークンを Redis に保存する。
//!
//! ## Redis キー設計
//!
//! | キー | 値 | TTL |
//! |-----|-----|-----|
//! | `magic_link:{token}` | メールアドレス | 900秒（15分） |
//!
//! 消費は `GETDEL` で行うので、同じトークンは高々 1 回しか交換できない。

use async_trait::async_trait;
use rand::{Rng, distr::Alphanumeric};
use redis::{AsyncCommands, aio::ConnectionManager};
use recipebox_domain::user::Email;

use crate::InfraError;

/// トークンの有効期限（秒）
pub const MAGIC_LINK_TTL_SECONDS: u64 = 15 * 60;

/// トークン長（英数字）
const TOKEN_LENGTH: usize = 48;

/// マジックリンクトークンストア
#[async_trait]
pub trait MagicLinkStore: Send + Sync {
    /// トークンを発行し、メールアドレスと紐付けて保存する
    async fn issue(&self, email: &Email) -> Result<String, InfraError>;

    /// トークンを消費し、紐付いたメールアドレスを返す
    ///
    /// 未発行・期限切れ・消費済みは `Ok(None)`。
    async fn consume(&self, token: &str) -> Result<Option<Email>, InfraError>;
}

/// Redis を使用したトークンストア
#[derive(Clone)]
pub struct RedisMagicLinkStore {
    conn: ConnectionManager,
}

impl RedisMagicLinkStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn token_key(token: &str) -> String {
        format!("magic_link:{token}")
    }
}

/// URL にそのまま載せられる乱数トークンを生成する
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[async_trait]
impl MagicLinkStore for RedisMagicLinkStore {
    async fn issue(&self, email: &Email) -> Result<String, InfraError> {
        let token = generate_token();
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(Self::token_key(&token), email.as_str(), MAGIC_LINK_TTL_SECONDS)
            .await?;
        Ok(token)
    }

    async fn consume(&self, token: &str) -> Result<Option<Email>, InfraError> {
        let mut conn = self.conn.clone();
        let stored: Option<String> = conn.get_del(Self::token_key(token)).await?;

        stored
            .map(|value| {
                Email::new(value).map_err(|e| {
                    InfraError::unexpected(format!("保存済みメールアドレスが不正: {e}"))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トークンは英数字で固定長() {
        let token = generate_token();

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_トークンは毎回異なる() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_トークンキーの形式() {
        assert_eq!(RedisMagicLinkStore::token_key("t0k3n"), "magic_link:t0k3n");
    }
}
