//! # 構造化レシピハンドラ
//!
//! 外部の自動化フローが生成した構造化レシピを受け取って保存する。
//!
//! ## エンドポイント
//!
//! - `POST /api/recipes` - `{ "output": { "recipe": {...} } }` を保存
//! - `GET /api/recipes` - 全件を新しい順で返す
//!
//! レスポンスのキーは camelCase（`prepTime`, `dietaryTags`, `createdAt` など）。
//!
//! 400 になるのは `output.recipe` か `name` が欠けている場合だけで、
//! 任意項目の型が期待と違っても読める範囲で受け取る。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use recipebox_domain::recipe::structured::{Ingredient, StructuredRecipe, StructuredRecipeDraft};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{ApiError, RouteMessages},
    usecase::RecipeIngestionUseCaseImpl,
};

const INGEST_MESSAGES: RouteMessages = RouteMessages {
    bad_request: "No recipe found in request",
    internal:    "Invalid request",
};

const LIST_MESSAGES: RouteMessages = RouteMessages {
    bad_request: "Invalid request",
    internal:    "Failed to fetch recipes",
};

/// 構造化レシピハンドラの共有状態
pub struct RecipeState {
    pub usecase: RecipeIngestionUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 投入リクエスト（外部フローの出力をそのまま受け取る）
#[derive(Debug, Deserialize)]
pub struct IngestRecipeRequest {
    pub output: IngestRecipeOutput,
}

#[derive(Debug, Deserialize)]
pub struct IngestRecipeOutput {
    pub recipe: RecipeInput,
}

/// 投入されるレシピ
///
/// `name` 以外は型を決め打ちせず JSON のまま受け取る。
#[derive(Debug, Deserialize)]
pub struct RecipeInput {
    pub name:              String,
    pub cuisine:           Option<Value>,
    pub prep_time_minutes: Option<Value>,
    pub cook_time_minutes: Option<Value>,
    pub difficulty:        Option<Value>,
    pub dietary_tags:      Option<Value>,
    pub ingredients:       Option<Value>,
    pub steps:             Option<Value>,
}

impl From<RecipeInput> for StructuredRecipeDraft {
    fn from(input: RecipeInput) -> Self {
        Self {
            name:              input.name,
            cuisine:           input.cuisine.and_then(text),
            prep_time_minutes: input.prep_time_minutes.and_then(minutes),
            cook_time_minutes: input.cook_time_minutes.and_then(minutes),
            difficulty:        input.difficulty.and_then(text),
            dietary_tags:      input.dietary_tags.map(text_list),
            ingredients:       input.ingredients.map(ingredient_list),
            steps:             input.steps.map(text_list),
        }
    }
}

/// 文字列はそのまま、数値や真偽値は文字列表現にする
fn text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// 分数。`"15"` のような数字の文字列も受け付け、読めない値は未指定とする
fn minutes(value: Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 配列なら各要素を文字列に、単独の値なら 1 要素のリストにする
fn text_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(text).collect(),
        other => text(other).into_iter().collect(),
    }
}

/// 材料は要素の形を問わずそのまま保持する
fn ingredient_list(value: Value) -> Vec<Ingredient> {
    match value {
        Value::Array(items) => items.into_iter().map(Ingredient::new).collect(),
        Value::Null => Vec::new(),
        other => vec![Ingredient::new(other)],
    }
}

/// 保存済みレシピ DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredRecipeDto {
    pub id:           Uuid,
    pub name:         String,
    pub cuisine:      Option<String>,
    pub prep_time:    Option<i32>,
    pub cook_time:    Option<i32>,
    pub difficulty:   Option<String>,
    pub dietary_tags: Vec<String>,
    pub ingredients:  Vec<Ingredient>,
    pub steps:        Vec<String>,
    pub created_at:   DateTime<Utc>,
}

impl From<StructuredRecipe> for StructuredRecipeDto {
    fn from(recipe: StructuredRecipe) -> Self {
        Self {
            id:           recipe.id.into_uuid(),
            name:         recipe.name,
            cuisine:      recipe.cuisine,
            prep_time:    recipe.prep_time,
            cook_time:    recipe.cook_time,
            difficulty:   recipe.difficulty,
            dietary_tags: recipe.dietary_tags,
            ingredients:  recipe.ingredients,
            steps:        recipe.steps,
            created_at:   recipe.created_at,
        }
    }
}

// --- ハンドラ ---

/// POST /api/recipes
///
/// `output.recipe` が読めない本文は 400。
#[tracing::instrument(skip_all)]
pub async fn ingest_recipe(
    State(state): State<Arc<RecipeState>>,
    payload: Result<Json<IngestRecipeRequest>, JsonRejection>,
) -> Result<Json<StructuredRecipeDto>, ApiError> {
    let Ok(Json(request)) = payload else {
        return Err(ApiError::bad_request(INGEST_MESSAGES.bad_request));
    };

    let saved = state
        .usecase
        .ingest(request.output.recipe.into())
        .await
        .map_err(|e| e.into_api_error(INGEST_MESSAGES))?;

    Ok(Json(saved.into()))
}

/// GET /api/recipes
#[tracing::instrument(skip_all)]
pub async fn list_recipes(
    State(state): State<Arc<RecipeState>>,
) -> Result<Json<Vec<StructuredRecipeDto>>, ApiError> {
    let recipes = state
        .usecase
        .list()
        .await
        .map_err(|e| e.into_api_error(LIST_MESSAGES))?;

    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn input(recipe: Value) -> StructuredRecipeDraft {
        serde_json::from_value::<RecipeInput>(recipe).unwrap().into()
    }

    #[test]
    fn test_型の違う任意項目も読める範囲で受け取る() {
        let draft = input(json!({
            "name": "Salad",
            "cuisine": "Greek",
            "prep_time_minutes": "10",
            "cook_time_minutes": 0,
            "dietary_tags": "vegan",
            "ingredients": [{"name": "salt", "amount": "to taste", "unit": ""}],
            "steps": ["Toss", 2]
        }));

        assert_eq!(draft.cuisine.as_deref(), Some("Greek"));
        assert_eq!(draft.prep_time_minutes, Some(10));
        assert_eq!(draft.cook_time_minutes, Some(0));
        assert_eq!(draft.dietary_tags, Some(vec!["vegan".to_string()]));
        assert_eq!(
            draft.ingredients,
            Some(vec![Ingredient::new(
                json!({"name": "salt", "amount": "to taste", "unit": ""})
            )])
        );
        assert_eq!(draft.steps, Some(vec!["Toss".to_string(), "2".to_string()]));
    }

    #[rstest]
    #[case::整数(json!(15), Some(15))]
    #[case::小数(json!(12.7), Some(12))]
    #[case::数字の文字列(json!(" 20 "), Some(20))]
    #[case::読めない文字列(json!("about 5"), None)]
    #[case::範囲外(json!(9_999_999_999_i64), None)]
    #[case::真偽値(json!(true), None)]
    fn test_分数の読み取り(#[case] value: Value, #[case] expected: Option<i32>) {
        assert_eq!(minutes(value), expected);
    }

    #[test]
    fn test_nameがなければ読み取りに失敗する() {
        let result = serde_json::from_value::<RecipeInput>(json!({"cuisine": "Thai"}));

        assert!(result.is_err());
    }
}
