//! # StructuredRecipeRepository
//!
//! `/api/recipes` に投入された構造化レシピの永続化を担当する。
//!
//! 材料リストは JSONB、食事制限タグと手順は TEXT[] に格納する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipebox_domain::recipe::structured::{
    Ingredient,
    NewStructuredRecipe,
    StructuredRecipe,
    StructuredRecipeId,
};
use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

use crate::error::InfraError;

/// 構造化レシピリポジトリトレイト
#[async_trait]
pub trait StructuredRecipeRepository: Send + Sync {
    /// 構造化レシピを保存し、保存後の値を返す
    async fn insert(&self, recipe: &NewStructuredRecipe) -> Result<StructuredRecipe, InfraError>;

    /// 全件を `created_at` の新しい順で取得する
    async fn find_all(&self) -> Result<Vec<StructuredRecipe>, InfraError>;
}

#[derive(Debug, FromRow)]
struct StructuredRecipeRow {
    id:           Uuid,
    name:         String,
    cuisine:      Option<String>,
    prep_time:    Option<i32>,
    cook_time:    Option<i32>,
    difficulty:   Option<String>,
    dietary_tags: Vec<String>,
    ingredients:  Json<Vec<Ingredient>>,
    steps:        Vec<String>,
    created_at:   DateTime<Utc>,
}

impl From<StructuredRecipeRow> for StructuredRecipe {
    fn from(row: StructuredRecipeRow) -> Self {
        StructuredRecipe {
            id:           StructuredRecipeId::from_uuid(row.id),
            name:         row.name,
            cuisine:      row.cuisine,
            prep_time:    row.prep_time,
            cook_time:    row.cook_time,
            difficulty:   row.difficulty,
            dietary_tags: row.dietary_tags,
            ingredients:  row.ingredients.0,
            steps:        row.steps,
            created_at:   row.created_at,
        }
    }
}

/// PostgreSQL 実装の StructuredRecipeRepository
#[derive(Debug, Clone)]
pub struct PostgresStructuredRecipeRepository {
    pool: PgPool,
}

impl PostgresStructuredRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StructuredRecipeRepository for PostgresStructuredRecipeRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(id = %recipe.id()))]
    async fn insert(&self, recipe: &NewStructuredRecipe) -> Result<StructuredRecipe, InfraError> {
        let row = sqlx::query_as::<_, StructuredRecipeRow>(
            r#"
            INSERT INTO structured_recipes (
                id, name, cuisine, prep_time, cook_time, difficulty,
                dietary_tags, ingredients, steps, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING
                id, name, cuisine, prep_time, cook_time, difficulty,
                dietary_tags, ingredients, steps, created_at
            "#,
        )
        .bind(recipe.id().as_uuid())
        .bind(recipe.name())
        .bind(recipe.cuisine())
        .bind(recipe.prep_time())
        .bind(recipe.cook_time())
        .bind(recipe.difficulty())
        .bind(recipe.dietary_tags())
        .bind(Json(recipe.ingredients()))
        .bind(recipe.steps())
        .bind(recipe.created_at())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<StructuredRecipe>, InfraError> {
        let rows = sqlx::query_as::<_, StructuredRecipeRow>(
            r#"
            SELECT
                id, name, cuisine, prep_time, cook_time, difficulty,
                dietary_tags, ingredients, steps, created_at
            FROM structured_recipes
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StructuredRecipe::from).collect())
    }
}
