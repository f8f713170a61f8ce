//! お気に入りユースケース
//!
//! すべての操作はセッションのユーザーに閉じる。他人のお気に入りは
//! 存在しないものとして扱い、`NotFound` を返す。

use std::sync::Arc;

use recipebox_domain::{
    clock::Clock,
    favorite::{Favorite, FavoriteId, FavoriteTitle, FavoriteToggleOutcome, NewFavorite},
    user::UserId,
};
use recipebox_infra::repository::FavoriteRepository;

use crate::error::AppError;

/// お気に入り追加・トグルの入力
#[derive(Debug, Clone)]
pub struct SaveFavoriteInput {
    pub user_id:   UserId,
    pub title:     Option<String>,
    pub content:   Option<String>,
    pub image_url: Option<String>,
}

/// お気に入りユースケース
pub struct FavoriteUseCaseImpl {
    repository: Arc<dyn FavoriteRepository>,
    clock:      Arc<dyn Clock>,
}

impl FavoriteUseCaseImpl {
    pub fn new(repository: Arc<dyn FavoriteRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// ユーザーのお気に入りを新しい順で返す（タイトルの部分一致で絞り込み可）
    pub async fn list(&self, user_id: &UserId, query: Option<&str>) -> Result<Vec<Favorite>, AppError> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        Ok(self.repository.find_by_user(user_id, query).await?)
    }

    /// お気に入りを 1 件返す
    pub async fn get(&self, id: &FavoriteId, user_id: &UserId) -> Result<Favorite, AppError> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// お気に入りに追加する
    ///
    /// 同じタイトルが既にあれば既存のものを返す。
    pub async fn add(&self, input: SaveFavoriteInput) -> Result<Favorite, AppError> {
        let favorite = self.new_favorite(input)?;
        let saved = self.repository.insert_or_get(&favorite).await?;

        tracing::info!(favorite.id = %saved.id, "お気に入りに追加しました");
        Ok(saved)
    }

    /// 同じタイトルがあれば削除し、なければ追加する
    pub async fn toggle(&self, input: SaveFavoriteInput) -> Result<FavoriteToggleOutcome, AppError> {
        let favorite = self.new_favorite(input)?;
        let outcome = self.repository.toggle(&favorite).await?;

        match &outcome {
            FavoriteToggleOutcome::Added(f) => {
                tracing::info!(favorite.id = %f.id, "トグルでお気に入りに追加しました");
            }
            FavoriteToggleOutcome::Removed(id) => {
                tracing::info!(favorite.id = %id, "トグルでお気に入りから削除しました");
            }
        }
        Ok(outcome)
    }

    /// お気に入りを削除する
    pub async fn delete(&self, id: &FavoriteId, user_id: &UserId) -> Result<(), AppError> {
        if !self.repository.delete(id, user_id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(favorite.id = %id, "お気に入りを削除しました");
        Ok(())
    }

    fn new_favorite(&self, input: SaveFavoriteInput) -> Result<NewFavorite, AppError> {
        let content = input
            .content
            .ok_or_else(|| AppError::Validation("content は必須です".to_string()))?;

        Ok(NewFavorite::new(
            input.user_id,
            FavoriteTitle::new(input.title.as_deref()),
            content,
            input.image_url,
            self.clock.now(),
        )?)
    }
}
