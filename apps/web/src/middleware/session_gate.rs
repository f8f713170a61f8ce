//! # セッションゲート
//!
//! 保護されたページと API の前段で `session_id` Cookie のセッションを 1 回だけ読み、
//! 見つかればハンドラに [`CurrentSession`] として渡す。
//!
//! 見つからない・期限切れの場合の応答はルートの種類で変わる:
//!
//! | 種類 | 応答 |
//! |------|------|
//! | ページ | `303 See Other` → `/` |
//! | API | `401 { "error": "Authentication required" }` |
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let gate = SessionGateState::new(session_manager.clone(), GateMode::Api);
//!
//! Router::new()
//!     .route("/api/favorites", get(list_favorites))
//!     .layer(from_fn_with_state(gate, require_session))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use recipebox_infra::{SessionData, SessionManager};

use crate::error::ApiError;

/// セッション Cookie 名
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// ゲートの対象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// サーバー描画ページ（未認証ならトップへリダイレクト）
    Page,
    /// JSON API（未認証なら 401）
    Api,
}

/// セッションゲートの状態
#[derive(Clone)]
pub struct SessionGateState {
    pub session_manager: Arc<dyn SessionManager>,
    pub mode:            GateMode,
}

impl SessionGateState {
    pub fn new(session_manager: Arc<dyn SessionManager>, mode: GateMode) -> Self {
        Self {
            session_manager,
            mode,
        }
    }
}

/// ゲートを通過したリクエストのセッション
///
/// リクエスト extensions に入る。ハンドラは `Extension<CurrentSession>` で受け取る。
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session_id: String,
    pub data:       SessionData,
}

/// セッションを確認するミドルウェア
pub async fn require_session(
    State(state): State<SessionGateState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(session_id) = jar
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
    else {
        return reject(state.mode);
    };

    match state.session_manager.get(&session_id).await {
        Ok(Some(data)) => {
            request
                .extensions_mut()
                .insert(CurrentSession { session_id, data });
            next.run(request).await
        }
        Ok(None) => reject(state.mode),
        Err(e) => {
            tracing::error!(
                error.category = "infrastructure",
                error.kind = "session",
                "セッション取得で内部エラー: {}",
                e
            );
            ApiError::internal("Something went wrong.").into_response()
        }
    }
}

fn reject(mode: GateMode) -> Response {
    match mode {
        GateMode::Page => Redirect::to("/").into_response(),
        GateMode::Api => ApiError::unauthorized().into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        middleware::from_fn_with_state,
        routing::get,
    };
    use chrono::Utc;
    use recipebox_domain::user::{Email, UserId};
    use recipebox_infra::mock::MockSessionManager;
    use tower::ServiceExt;

    use super::*;

    async fn whoami(Extension(session): Extension<CurrentSession>) -> String {
        session.data.email().to_string()
    }

    fn app(sessions: MockSessionManager, mode: GateMode) -> Router {
        Router::new()
            .route("/protected", get(whoami))
            .layer(from_fn_with_state(
                SessionGateState::new(Arc::new(sessions), mode),
                require_session,
            ))
    }

    fn request(cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/protected");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_ページはcookieなしでトップへリダイレクトされる() {
        let response = app(MockSessionManager::new(), GateMode::Page)
            .oneshot(request(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn test_apiは期限切れセッションで401になる() {
        let response = app(MockSessionManager::new(), GateMode::Api)
            .oneshot(request(Some("session_id=expired")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_有効なセッションはハンドラに渡される() {
        let sessions = MockSessionManager::new();
        sessions.insert(
            "live",
            SessionData::new(
                UserId::new(),
                Email::new("chef@example.com").unwrap(),
                Utc::now(),
            ),
        );

        let response = app(sessions, GateMode::Page)
            .oneshot(request(Some("session_id=live")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"chef@example.com");
    }
}
