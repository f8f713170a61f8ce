//! # レシピ
//!
//! 2 種類のレシピ記録を扱う。
//!
//! | 型 | 由来 | テーブル |
//! |---|------|---------|
//! | [`GeneratedRecipe`] | `/api/chat` 経由で Webhook が生成した HTML | `generated_recipes` |
//! | [`structured::StructuredRecipe`] | `/api/recipes` に投入された構造化データ | `structured_recipes` |
//!
//! 両者の間に関連はない。
//!
//! ## サブモジュール
//!
//! - [`content`] - Webhook 応答の HTML 正規化、コピー用プレーンテキスト化
//! - [`structured`] - 構造化レシピとその入力

pub mod content;
pub mod structured;

use chrono::{DateTime, Utc};

use crate::DomainError;

define_uuid_id! {
    /// 生成レシピ ID
    pub struct GeneratedRecipeId;
}

/// レシピ名（Webhook への Prompt）
///
/// 空白以外の文字を含む文字列。入力は加工せず、そのまま Webhook に送り
/// タイトルとして保存する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePrompt(String);

impl RecipePrompt {
    /// リクエストの `message` からレシピ名を作る
    ///
    /// 未指定・空文字列・空白のみは `DomainError::Validation`。
    pub fn new(message: Option<&str>) -> Result<Self, DomainError> {
        match message {
            Some(text) if !text.trim().is_empty() => Ok(Self(text.to_string())),
            _ => Err(DomainError::Validation(
                "レシピ名は必須です".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 生成レシピ
///
/// Webhook の応答を正規化した HTML を、入力されたレシピ名とともに保持する。
/// 同じタイトルの記録が複数あってもよい。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRecipe {
    id:         GeneratedRecipeId,
    title:      String,
    html:       String,
    created_at: DateTime<Utc>,
}

impl GeneratedRecipe {
    /// 新しい生成レシピを作成する
    pub fn new(prompt: RecipePrompt, html: String, now: DateTime<Utc>) -> Self {
        Self {
            id: GeneratedRecipeId::new(),
            title: prompt.into_string(),
            html,
            created_at: now,
        }
    }

    pub fn id(&self) -> &GeneratedRecipeId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
