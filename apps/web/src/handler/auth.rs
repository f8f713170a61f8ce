//! # 認証ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/auth/magic-link` - サインイン用リンクをメールで送る
//! - `GET /auth/callback?token=` - トークンを検証してセッション Cookie を発行
//! - `GET /api/auth/session` - 現在のユーザー（セッション必須）
//! - `POST /api/auth/logout` - ログアウト

use std::sync::Arc;

use axum::{
    Extension,
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use recipebox_infra::session::SESSION_TTL_SECONDS;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, RouteMessages},
    middleware::{CurrentSession, SESSION_COOKIE_NAME},
    usecase::AuthUseCaseImpl,
};

const MAGIC_LINK_MESSAGES: RouteMessages = RouteMessages {
    bad_request: "Invalid email address",
    internal:    "Error sending magic link",
};

/// 認証ハンドラの共有状態
pub struct AuthState {
    pub usecase:        AuthUseCaseImpl,
    pub secure_cookies: bool,
}

// --- リクエスト/レスポンス型 ---

/// マジックリンク要求
#[derive(Debug, Deserialize)]
pub struct MagicLinkRequest {
    pub email: Option<String>,
}

/// マジックリンク要求の結果
#[derive(Debug, Serialize)]
pub struct MagicLinkResponse {
    pub message: &'static str,
}

/// コールバックのクエリ
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub token: Option<String>,
}

/// 現在のユーザー
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email:   String,
}

// --- Cookie ヘルパー ---

fn build_session_cookie(session_id: &str, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE_NAME, session_id.to_string()))
        .path("/")
        .max_age(time::Duration::seconds(SESSION_TTL_SECONDS as i64))
        .http_only(true)
        .same_site(SameSite::Lax);

    if secure {
        builder = builder.secure(true);
    }

    builder.build()
}

fn build_clear_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

// --- ハンドラ ---

/// POST /api/auth/magic-link
///
/// 登録済みかどうかにかかわらず同じ応答を返す。
#[tracing::instrument(skip_all)]
pub async fn request_magic_link(
    State(state): State<Arc<AuthState>>,
    payload: Result<Json<MagicLinkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.ok().and_then(|Json(body)| body.email);

    state
        .usecase
        .request_magic_link(email.as_deref())
        .await
        .map_err(|e| e.into_api_error(MAGIC_LINK_MESSAGES))?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MagicLinkResponse {
            message: "Check your email for the magic link!",
        }),
    ))
}

/// GET /auth/callback
///
/// 成功したら `/recipes` へ、トークンが無効なら `/` へリダイレクトする。
#[tracing::instrument(skip_all)]
pub async fn auth_callback(
    State(state): State<Arc<AuthState>>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> impl IntoResponse {
    let Some(token) = query.token.filter(|t| !t.is_empty()) else {
        return (jar, Redirect::to("/"));
    };

    match state.usecase.sign_in(&token).await {
        Ok(Some(session_id)) => {
            let jar = jar.add(build_session_cookie(&session_id, state.secure_cookies));
            (jar, Redirect::to("/recipes"))
        }
        Ok(None) => (jar, Redirect::to("/")),
        Err(e) => {
            tracing::error!(error = %e, "サインインに失敗しました");
            (jar, Redirect::to("/"))
        }
    }
}

/// GET /api/auth/session
pub async fn current_session(Extension(session): Extension<CurrentSession>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: *session.data.user_id().as_uuid(),
        email:   session.data.email().as_str().to_string(),
    })
}

/// POST /api/auth/logout
///
/// セッションがなくても 204 を返す。
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<Arc<AuthState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME)
        && let Err(e) = state.usecase.sign_out(cookie.value()).await
    {
        tracing::warn!(error = %e, "セッションの削除に失敗しました");
    }

    (jar.add(build_clear_cookie()), StatusCode::NO_CONTENT)
}
