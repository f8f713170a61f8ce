//! # お気に入りハンドラ
//!
//! ## エンドポイント（セッション必須）
//!
//! - `GET /api/favorites?q=` - 一覧（新しい順、タイトル部分一致）
//! - `POST /api/favorites` - 追加（同じタイトルがあれば既存を返す）
//! - `POST /api/favorites/toggle` - 同じタイトルがあれば削除、なければ追加
//! - `GET /api/favorites/{id}` - 1 件取得
//! - `DELETE /api/favorites/{id}` - 削除
//!
//! 他人のお気に入りの ID や UUID として読めない ID は 404。

use std::sync::Arc;

use axum::{
    Extension,
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use recipebox_domain::favorite::{Favorite, FavoriteId, FavoriteToggleOutcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, RouteMessages},
    middleware::CurrentSession,
    usecase::{FavoriteUseCaseImpl, SaveFavoriteInput},
};

const LIST_MESSAGES: RouteMessages = RouteMessages {
    bad_request: "Invalid request",
    internal:    "Failed to fetch favorites",
};

const SAVE_MESSAGES: RouteMessages = RouteMessages {
    bad_request: "Content is required",
    internal:    "Failed to save favorite",
};

const TOGGLE_MESSAGES: RouteMessages = RouteMessages {
    bad_request: "Content is required",
    internal:    "Error updating favorites",
};

const DELETE_MESSAGES: RouteMessages = RouteMessages {
    bad_request: "Invalid request",
    internal:    "Failed to delete favorite",
};

/// お気に入りハンドラの共有状態
pub struct FavoriteState {
    pub usecase: FavoriteUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 一覧の検索条件
#[derive(Debug, Deserialize)]
pub struct FavoriteQuery {
    pub q: Option<String>,
}

/// 追加・トグルのリクエスト
#[derive(Debug, Default, Deserialize)]
pub struct SaveFavoriteRequest {
    pub title:     Option<String>,
    pub content:   Option<String>,
    pub image_url: Option<String>,
}

/// お気に入り DTO
#[derive(Debug, Serialize)]
pub struct FavoriteDto {
    pub id:         Uuid,
    pub title:      String,
    pub content:    String,
    pub image_url:  Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Favorite> for FavoriteDto {
    fn from(favorite: Favorite) -> Self {
        Self {
            id:         favorite.id.into_uuid(),
            title:      favorite.title,
            content:    favorite.content,
            image_url:  favorite.image_url,
            created_at: favorite.created_at,
        }
    }
}

/// トグル結果
///
/// `{ "status": "added", "favorite": {...} }` または `{ "status": "removed", "id": "..." }`
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToggleFavoriteResponse {
    Added { favorite: FavoriteDto },
    Removed { id: Uuid },
}

impl From<FavoriteToggleOutcome> for ToggleFavoriteResponse {
    fn from(outcome: FavoriteToggleOutcome) -> Self {
        match outcome {
            FavoriteToggleOutcome::Added(favorite) => Self::Added {
                favorite: favorite.into(),
            },
            FavoriteToggleOutcome::Removed(id) => Self::Removed { id: id.into_uuid() },
        }
    }
}

/// パスの ID を読む。UUID でなければ存在しないものとして扱う
pub(crate) fn parse_favorite_id(raw: &str) -> Result<FavoriteId, ApiError> {
    Uuid::parse_str(raw)
        .map(FavoriteId::from_uuid)
        .map_err(|_| ApiError::not_found())
}

fn save_input(session: &CurrentSession, request: SaveFavoriteRequest) -> SaveFavoriteInput {
    SaveFavoriteInput {
        user_id:   session.data.user_id().clone(),
        title:     request.title,
        content:   request.content,
        image_url: request.image_url,
    }
}

// --- ハンドラ ---

/// GET /api/favorites
#[tracing::instrument(skip_all)]
pub async fn list_favorites(
    State(state): State<Arc<FavoriteState>>,
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<FavoriteQuery>,
) -> Result<Json<Vec<FavoriteDto>>, ApiError> {
    let favorites = state
        .usecase
        .list(session.data.user_id(), query.q.as_deref())
        .await
        .map_err(|e| e.into_api_error(LIST_MESSAGES))?;

    Ok(Json(favorites.into_iter().map(Into::into).collect()))
}

/// POST /api/favorites
#[tracing::instrument(skip_all)]
pub async fn create_favorite(
    State(state): State<Arc<FavoriteState>>,
    Extension(session): Extension<CurrentSession>,
    payload: Result<Json<SaveFavoriteRequest>, JsonRejection>,
) -> Result<Json<FavoriteDto>, ApiError> {
    let Ok(Json(request)) = payload else {
        return Err(ApiError::bad_request(SAVE_MESSAGES.bad_request));
    };

    let saved = state
        .usecase
        .add(save_input(&session, request))
        .await
        .map_err(|e| e.into_api_error(SAVE_MESSAGES))?;

    Ok(Json(saved.into()))
}

/// POST /api/favorites/toggle
#[tracing::instrument(skip_all)]
pub async fn toggle_favorite(
    State(state): State<Arc<FavoriteState>>,
    Extension(session): Extension<CurrentSession>,
    payload: Result<Json<SaveFavoriteRequest>, JsonRejection>,
) -> Result<Json<ToggleFavoriteResponse>, ApiError> {
    let Ok(Json(request)) = payload else {
        return Err(ApiError::bad_request(TOGGLE_MESSAGES.bad_request));
    };

    let outcome = state
        .usecase
        .toggle(save_input(&session, request))
        .await
        .map_err(|e| e.into_api_error(TOGGLE_MESSAGES))?;

    Ok(Json(outcome.into()))
}

/// GET /api/favorites/{id}
#[tracing::instrument(skip_all, fields(favorite.id = %id))]
pub async fn get_favorite(
    State(state): State<Arc<FavoriteState>>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<String>,
) -> Result<Json<FavoriteDto>, ApiError> {
    let id = parse_favorite_id(&id)?;

    let favorite = state
        .usecase
        .get(&id, session.data.user_id())
        .await
        .map_err(|e| e.into_api_error(LIST_MESSAGES))?;

    Ok(Json(favorite.into()))
}

/// DELETE /api/favorites/{id}
#[tracing::instrument(skip_all, fields(favorite.id = %id))]
pub async fn delete_favorite(
    State(state): State<Arc<FavoriteState>>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_favorite_id(&id)?;

    state
        .usecase
        .delete(&id, session.data.user_id())
        .await
        .map_err(|e| e.into_api_error(DELETE_MESSAGES))?;

    Ok(StatusCode::NO_CONTENT)
}
