//! # 構造化レシピ
//!
//! 外部の自動化フローから `/api/recipes` に投入されるレシピ。
//! 任意項目は欠落していてもよく、空文字列と 0 分は「未指定」として扱う。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

define_uuid_id! {
    /// 構造化レシピ ID
    pub struct StructuredRecipeId;
}

/// 材料
///
/// `structured_recipes.ingredients` に JSON 配列の要素として格納される。
/// 外部フローの出力は `amount` が文字列だったり `unit` が欠けていたりするため、
/// 形は検証せず受け取った JSON をそのまま保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ingredient(serde_json::Value);

impl Ingredient {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// 材料名（文字列で渡された場合のみ）
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(serde_json::Value::as_str)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// 構造化レシピの投入内容
///
/// 外部から渡された値をそのまま受け取り、[`NewStructuredRecipe::new`] で
/// 保存用の形に整える。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredRecipeDraft {
    pub name:              String,
    pub cuisine:           Option<String>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub difficulty:        Option<String>,
    pub dietary_tags:      Option<Vec<String>>,
    pub ingredients:       Option<Vec<Ingredient>>,
    pub steps:             Option<Vec<String>>,
}

/// 保存前の構造化レシピ
///
/// # 不変条件
///
/// - 任意の文字列項目は `Some("")` にならない
/// - 調理時間は `Some(0)` にならない（負の値はそのまま保持する）
#[derive(Debug, Clone, PartialEq)]
pub struct NewStructuredRecipe {
    id:           StructuredRecipeId,
    name:         String,
    cuisine:      Option<String>,
    prep_time:    Option<i32>,
    cook_time:    Option<i32>,
    difficulty:   Option<String>,
    dietary_tags: Vec<String>,
    ingredients:  Vec<Ingredient>,
    steps:        Vec<String>,
    created_at:   DateTime<Utc>,
}

impl NewStructuredRecipe {
    pub fn new(draft: StructuredRecipeDraft, now: DateTime<Utc>) -> Self {
        Self {
            id:           StructuredRecipeId::new(),
            name:         draft.name,
            cuisine:      non_empty(draft.cuisine),
            prep_time:    non_zero(draft.prep_time_minutes),
            cook_time:    non_zero(draft.cook_time_minutes),
            difficulty:   non_empty(draft.difficulty),
            dietary_tags: draft.dietary_tags.unwrap_or_default(),
            ingredients:  draft.ingredients.unwrap_or_default(),
            steps:        draft.steps.unwrap_or_default(),
            created_at:   now,
        }
    }

    pub fn id(&self) -> &StructuredRecipeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cuisine(&self) -> Option<&str> {
        self.cuisine.as_deref()
    }

    pub fn prep_time(&self) -> Option<i32> {
        self.prep_time
    }

    pub fn cook_time(&self) -> Option<i32> {
        self.cook_time
    }

    pub fn difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref()
    }

    pub fn dietary_tags(&self) -> &[String] {
        &self.dietary_tags
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 保存済みレシピに変換する
    pub fn into_saved(self) -> StructuredRecipe {
        StructuredRecipe {
            id:           self.id,
            name:         self.name,
            cuisine:      self.cuisine,
            prep_time:    self.prep_time,
            cook_time:    self.cook_time,
            difficulty:   self.difficulty,
            dietary_tags: self.dietary_tags,
            ingredients:  self.ingredients,
            steps:        self.steps,
            created_at:   self.created_at,
        }
    }
}

/// 保存済みの構造化レシピ
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRecipe {
    pub id:           StructuredRecipeId,
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

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn non_zero(value: Option<i32>) -> Option<i32> {
    value.filter(|&n| n != 0)
}
