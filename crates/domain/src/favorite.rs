//! # お気に入り
//!
//! ユーザーが生成レシピの HTML を保存したもの。所有者は常に 1 人で、
//! 削除は物理削除。`(user_id, title)` はユーザー内で一意。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use recipebox_domain::{
//!     favorite::{Favorite, FavoriteTitle, NewFavorite},
//!     user::UserId,
//! };
//!
//! let new = NewFavorite::new(
//!     UserId::new(),
//!     FavoriteTitle::new(None),
//!     "<p>Soup</p>".to_string(),
//!     None,
//!     chrono::Utc::now(),
//! )?;
//! assert_eq!(new.title().as_str(), "Untitled Recipe");
//!
//! let favorite = new.into_saved();
//! assert!(favorite.matches_search(Some("untitled")));
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};

use crate::{DomainError, user::UserId};

define_uuid_id! {
    /// お気に入り ID
    pub struct FavoriteId;
}

/// タイトル未指定時の既定値
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// お気に入りのタイトル
///
/// 前後の空白を除去し、空なら [`UNTITLED_RECIPE`] になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FavoriteTitle(String);

impl FavoriteTitle {
    pub fn new(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(title) if !title.is_empty() => Self(title.to_string()),
            _ => Self(UNTITLED_RECIPE.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for FavoriteTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 保存済みのお気に入り
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub id:         FavoriteId,
    pub user_id:    UserId,
    pub title:      String,
    pub content:    String,
    pub image_url:  Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// 検索語がタイトルに含まれるか（大文字小文字を区別しない）
    ///
    /// 検索語が未指定・空白のみなら常に true。
    pub fn matches_search(&self, query: Option<&str>) -> bool {
        match query.map(str::trim) {
            Some(q) if !q.is_empty() => self.title.to_lowercase().contains(&q.to_lowercase()),
            _ => true,
        }
    }
}

/// 保存前のお気に入り
///
/// # 不変条件
///
/// - `content` は空ではない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFavorite {
    id:         FavoriteId,
    user_id:    UserId,
    title:      FavoriteTitle,
    content:    String,
    image_url:  Option<String>,
    created_at: DateTime<Utc>,
}

impl NewFavorite {
    /// # エラー
    ///
    /// `content` が空（空白のみを含む）の場合は `DomainError::Validation`。
    pub fn new(
        user_id: UserId,
        title: FavoriteTitle,
        content: String,
        image_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::Validation(
                "お気に入りの本文は必須です".to_string(),
            ));
        }

        Ok(Self {
            id: FavoriteId::new(),
            user_id,
            title,
            content,
            image_url: image_url.filter(|url| !url.trim().is_empty()),
            created_at: now,
        })
    }

    pub fn id(&self) -> &FavoriteId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn title(&self) -> &FavoriteTitle {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 保存済みのお気に入りに変換する
    pub fn into_saved(self) -> Favorite {
        Favorite {
            id:         self.id,
            user_id:    self.user_id,
            title:      self.title.into_string(),
            content:    self.content,
            image_url:  self.image_url,
            created_at: self.created_at,
        }
    }
}

/// トグル操作の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteToggleOutcome {
    /// 同じタイトルがなかったので追加した
    Added(Favorite),
    /// 同じタイトルがあったので削除した
    Removed(FavoriteId),
}
