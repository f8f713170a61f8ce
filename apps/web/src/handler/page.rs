//! # ページハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /` - サインイン
//! - `GET /recipes` - レシピ生成（セッション必須）
//! - `GET /favorites?q=&confirm=` - お気に入り一覧（セッション必須）
//! - `GET /favorites/{id}` - お気に入り詳細（セッション必須）
//! - `POST /favorites/{id}/delete` - 削除して一覧へ戻る（セッション必須）
//!
//! HTML フォームは DELETE を送れないため、ページからの削除は POST で受ける。

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use recipebox_domain::favorite::FavoriteId;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::CurrentSession,
    usecase::FavoriteUseCaseImpl,
    view::PageRenderer,
};

/// ページハンドラの共有状態
pub struct PageState {
    pub renderer:  PageRenderer,
    pub favorites: FavoriteUseCaseImpl,
}

/// 一覧ページのクエリ
#[derive(Debug, Deserialize)]
pub struct FavoritesPageQuery {
    pub q:       Option<String>,
    pub confirm: Option<String>,
}

/// ページ向けのエラー応答
#[derive(Debug)]
pub enum PageError {
    NotFound,
    Internal,
}

impl From<AppError> for PageError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::NotFound => Self::NotFound,
            other => {
                tracing::error!(error = %other, "ページの生成に失敗しました");
                Self::Internal
            }
        }
    }
}

impl From<tera::Error> for PageError {
    fn from(error: tera::Error) -> Self {
        AppError::Render(error).into()
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Html("<h1>Not found</h1><p><a href=\"/favorites\">Back to favorites</a></p>"),
            )
                .into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Something went wrong.</h1>"),
            )
                .into_response(),
        }
    }
}

fn favorite_id(raw: &str) -> Result<FavoriteId, PageError> {
    Uuid::parse_str(raw)
        .map(FavoriteId::from_uuid)
        .map_err(|_| PageError::NotFound)
}

/// GET /
pub async fn index_page(State(state): State<Arc<PageState>>) -> Result<Html<String>, PageError> {
    Ok(state.renderer.index()?)
}

/// GET /recipes
pub async fn recipes_page(
    State(state): State<Arc<PageState>>,
    Extension(session): Extension<CurrentSession>,
) -> Result<Html<String>, PageError> {
    Ok(state.renderer.recipes(session.data.email().as_str())?)
}

/// GET /favorites
#[tracing::instrument(skip_all)]
pub async fn favorites_page(
    State(state): State<Arc<PageState>>,
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<FavoritesPageQuery>,
) -> Result<Html<String>, PageError> {
    let favorites = state
        .favorites
        .list(session.data.user_id(), query.q.as_deref())
        .await?;

    Ok(state.renderer.favorites(
        session.data.email().as_str(),
        &favorites,
        query.q.as_deref(),
        query.confirm.as_deref(),
    )?)
}

/// GET /favorites/{id}
#[tracing::instrument(skip_all, fields(favorite.id = %id))]
pub async fn favorite_page(
    State(state): State<Arc<PageState>>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let id = favorite_id(&id)?;
    let favorite = state.favorites.get(&id, session.data.user_id()).await?;

    Ok(state
        .renderer
        .favorite(session.data.email().as_str(), &favorite)?)
}

/// POST /favorites/{id}/delete
#[tracing::instrument(skip_all, fields(favorite.id = %id))]
pub async fn delete_favorite_page(
    State(state): State<Arc<PageState>>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<String>,
) -> Result<Redirect, PageError> {
    let id = favorite_id(&id)?;
    state.favorites.delete(&id, session.data.user_id()).await?;

    Ok(Redirect::to("/favorites"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_見つからないエラーは404ページになる() {
        let response = PageError::from(AppError::NotFound).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_その他のエラーは500ページになる() {
        let response = PageError::from(AppError::Validation("x".to_string())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_uuidでないidは404() {
        assert!(matches!(favorite_id("abc"), Err(PageError::NotFound)));
    }
}
