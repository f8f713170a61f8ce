//! # レシピ生成ハンドラ
//!
//! `POST /api/chat`: レシピ名を Webhook に送り、生成された HTML を返す。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, RouteMessages},
    usecase::RecipeGenerationUseCaseImpl,
};

const MESSAGES: RouteMessages = RouteMessages {
    bad_request: "Please provide a recipe name.",
    internal:    "Something went wrong.",
};

/// レシピ生成ハンドラの共有状態
pub struct ChatState {
    pub usecase: RecipeGenerationUseCaseImpl,
}

/// レシピ生成リクエスト
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// レシピ生成レスポンス
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub html: String,
    pub id:   Uuid,
}

/// POST /api/chat
///
/// 本文が JSON オブジェクトとして読めない場合も `message` 欠落と同じ 400 にする。
#[tracing::instrument(skip_all)]
pub async fn chat(
    State(state): State<Arc<ChatState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = payload.ok().and_then(|Json(body)| body.message);

    let recipe = state
        .usecase
        .generate(message.as_deref())
        .await
        .map_err(|e| e.into_api_error(MESSAGES))?;

    Ok(Json(ChatResponse {
        html: recipe.html().to_string(),
        id:   *recipe.id().as_uuid(),
    }))
}
