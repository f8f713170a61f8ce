//! # GeneratedRecipeRepository
//!
//! `/api/chat` で生成したレシピ HTML の永続化を担当する。
//! 書き込み専用で、同じタイトルの行が何件あってもよい。

use async_trait::async_trait;
use recipebox_domain::recipe::GeneratedRecipe;
use sqlx::PgPool;

use crate::error::InfraError;

/// 生成レシピリポジトリトレイト
#[async_trait]
pub trait GeneratedRecipeRepository: Send + Sync {
    /// 生成レシピを保存する
    async fn insert(&self, recipe: &GeneratedRecipe) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の GeneratedRecipeRepository
#[derive(Debug, Clone)]
pub struct PostgresGeneratedRecipeRepository {
    pool: PgPool,
}

impl PostgresGeneratedRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GeneratedRecipeRepository for PostgresGeneratedRecipeRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(id = %recipe.id()))]
    async fn insert(&self, recipe: &GeneratedRecipe) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO generated_recipes (id, title, html, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(recipe.id().as_uuid())
        .bind(recipe.title())
        .bind(recipe.html())
        .bind(recipe.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
