//! # ユーザー
//!
//! マジックリンク認証でサインインする利用者と、そのメールアドレスを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`User`] | ユーザー | 初回サインイン時に作成される。お気に入りの所有者 |
//! | [`Email`] | メールアドレス | マジックリンクの送信先。小文字・前後空白除去で正規化 |
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use recipebox_domain::user::{Email, User, UserId};
//!
//! let email = Email::new("  Chef@Example.com ")?;
//! assert_eq!(email.as_str(), "chef@example.com");
//!
//! let user = User::new(UserId::new(), email, chrono::Utc::now());
//! assert_eq!(user.email().as_str(), "chef@example.com");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

define_uuid_id! {
    /// ユーザー ID（一意識別子）
    ///
    /// お気に入りの所有者判定とセッションの紐付けに使う。
    pub struct UserId;
}

/// メールアドレスの最大長（RFC 5321 のパス長上限に合わせる）
const EMAIL_MAX_LENGTH: usize = 254;

/// メールアドレス（値オブジェクト）
///
/// 生成時に前後の空白を取り除き、小文字に正規化する。
/// 大文字小文字だけが異なるアドレスは同じユーザーに対応する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式で、ドメイン部に `.` を含む
    /// - 空白を含まない
    /// - 最大 254 文字
    ///
    /// # エラー
    ///
    /// バリデーションに失敗した場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_lowercase();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        if value.len() > EMAIL_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "メールアドレスは{EMAIL_MAX_LENGTH}文字以内である必要があります"
            )));
        }

        let invalid = || DomainError::Validation("メールアドレスの形式が不正です".to_string());

        if value.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(invalid());
        };

        if local.is_empty()
            || domain.contains('@')
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
        {
            return Err(invalid());
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// ユーザーエンティティ
///
/// # 不変条件
///
/// - `email` はシステム全体で一意
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:         UserId,
    email:      Email,
    created_at: DateTime<Utc>,
}

impl User {
    /// 新しいユーザーを作成する
    pub fn new(id: UserId, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            created_at: now,
        }
    }

    /// データベースから取得したデータで復元する
    pub fn from_db(id: UserId, email: Email, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
