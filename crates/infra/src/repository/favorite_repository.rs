//! # FavoriteRepository
//!
//! お気に入りの永続化を担当するリポジトリ。
//!
//! - すべての操作はユーザー ID で絞り込む（他人のお気に入りは見えないし消せない）
//! - `(user_id, title)` の一意制約に乗せて、追加とトグルを競合に強くする

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipebox_domain::{
    favorite::{Favorite, FavoriteId, FavoriteToggleOutcome, NewFavorite},
    user::UserId,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::InfraError;

/// お気に入りリポジトリトレイト
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// ユーザーのお気に入りを新しい順で取得する
    ///
    /// `query` があればタイトルの部分一致（大文字小文字を区別しない）で絞り込む。
    async fn find_by_user(
        &self,
        user_id: &UserId,
        query: Option<&str>,
    ) -> Result<Vec<Favorite>, InfraError>;

    /// ユーザーのお気に入りを 1 件取得する
    async fn find_by_id(
        &self,
        id: &FavoriteId,
        user_id: &UserId,
    ) -> Result<Option<Favorite>, InfraError>;

    /// お気に入りを追加する
    ///
    /// 同じユーザー・タイトルが既にあれば何も変えずに既存のものを返す。
    async fn insert_or_get(&self, favorite: &NewFavorite) -> Result<Favorite, InfraError>;

    /// 同じユーザー・タイトルがあれば削除し、なければ追加する
    async fn toggle(&self, favorite: &NewFavorite) -> Result<FavoriteToggleOutcome, InfraError>;

    /// お気に入りを削除する
    ///
    /// 削除した場合は `true`。存在しない・他人のものは `false`。
    async fn delete(&self, id: &FavoriteId, user_id: &UserId) -> Result<bool, InfraError>;
}

#[derive(Debug, FromRow)]
struct FavoriteRow {
    id:         Uuid,
    user_id:    Uuid,
    title:      String,
    content:    String,
    image_url:  Option<String>,
    created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Favorite {
            id:         FavoriteId::from_uuid(row.id),
            user_id:    UserId::from_uuid(row.user_id),
            title:      row.title,
            content:    row.content,
            image_url:  row.image_url,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL 実装の FavoriteRepository
#[derive(Debug, Clone)]
pub struct PostgresFavoriteRepository {
    pool: PgPool,
}

impl PostgresFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PostgresFavoriteRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
    async fn find_by_user(
        &self,
        user_id: &UserId,
        query: Option<&str>,
    ) -> Result<Vec<Favorite>, InfraError> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        // strpos はワイルドカードを解釈しないので、検索語の % や _ をそのまま扱える
        let rows = sqlx::query_as::<_, FavoriteRow>(
            r#"
            SELECT id, user_id, title, content, image_url, created_at
            FROM favorites
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR strpos(lower(title), lower($2)) > 0)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %user_id))]
    async fn find_by_id(
        &self,
        id: &FavoriteId,
        user_id: &UserId,
    ) -> Result<Option<Favorite>, InfraError> {
        let row = sqlx::query_as::<_, FavoriteRow>(
            r#"
            SELECT id, user_id, title, content, image_url, created_at
            FROM favorites
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Favorite::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %favorite.user_id()))]
    async fn insert_or_get(&self, favorite: &NewFavorite) -> Result<Favorite, InfraError> {
        // 競合時は同じ値で UPDATE して既存行を RETURNING で受け取る
        let row = sqlx::query_as::<_, FavoriteRow>(
            r#"
            INSERT INTO favorites (id, user_id, title, content, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, title) DO UPDATE SET title = EXCLUDED.title
            RETURNING id, user_id, title, content, image_url, created_at
            "#,
        )
        .bind(favorite.id().as_uuid())
        .bind(favorite.user_id().as_uuid())
        .bind(favorite.title().as_str())
        .bind(favorite.content())
        .bind(favorite.image_url())
        .bind(favorite.created_at())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %favorite.user_id()))]
    async fn toggle(&self, favorite: &NewFavorite) -> Result<FavoriteToggleOutcome, InfraError> {
        let mut tx = self.pool.begin().await?;

        let delete_existing = r#"
            DELETE FROM favorites
            WHERE user_id = $1 AND title = $2
            RETURNING id
            "#;

        let removed: Option<(Uuid,)> = sqlx::query_as(delete_existing)
            .bind(favorite.user_id().as_uuid())
            .bind(favorite.title().as_str())
            .fetch_optional(&mut *tx)
            .await?;

        if let Some((id,)) = removed {
            tx.commit().await?;
            return Ok(FavoriteToggleOutcome::Removed(FavoriteId::from_uuid(id)));
        }

        let inserted = sqlx::query_as::<_, FavoriteRow>(
            r#"
            INSERT INTO favorites (id, user_id, title, content, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, title) DO NOTHING
            RETURNING id, user_id, title, content, image_url, created_at
            "#,
        )
        .bind(favorite.id().as_uuid())
        .bind(favorite.user_id().as_uuid())
        .bind(favorite.title().as_str())
        .bind(favorite.content())
        .bind(favorite.image_url())
        .bind(favorite.created_at())
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match inserted {
            Some(row) => FavoriteToggleOutcome::Added(row.into()),
            None => {
                // 並行するトグルが先に追加をコミットした。2 回目のトグルとして削除する
                let (id,): (Uuid,) = sqlx::query_as(delete_existing)
                    .bind(favorite.user_id().as_uuid())
                    .bind(favorite.title().as_str())
                    .fetch_one(&mut *tx)
                    .await?;
                FavoriteToggleOutcome::Removed(FavoriteId::from_uuid(id))
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %user_id))]
    async fn delete(&self, id: &FavoriteId, user_id: &UserId) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            DELETE FROM favorites
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
