//! # Web アプリのエラーハンドリング
//!
//! ユースケースが返す [`AppError`] と、クライアントへ返す [`ApiError`] を定義する。
//!
//! クライアント向けの分類は 400 / 401 / 404 / 500 の 4 つだけで、
//! 本文は `{ "error": string }`。400 と 500 の文言はルートごとに決まっているため、
//! ハンドラが [`RouteMessages`] を渡して [`AppError::into_api_error`] で変換する。
//! 500 になるエラーはこの変換時に `error.category` / `error.kind` 付きでログに残す。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recipebox_domain::{DomainError, notification::NotificationError};
use recipebox_infra::{InfraError, InfraErrorKind};
use recipebox_shared::ErrorResponse;
use thiserror::Error;

use crate::client::WebhookError;

/// ユースケース層のエラー
#[derive(Debug, Error)]
pub enum AppError {
    /// 入力が不正
    #[error("入力が不正です: {0}")]
    Validation(String),

    /// セッションがない
    #[error("認証が必要です")]
    Unauthorized,

    /// リソースが存在しない（または他人のもの）
    #[error("リソースが見つかりません")]
    NotFound,

    /// ドメインの不変条件違反
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// データベース・Redis
    #[error("インフラエラー: {0}")]
    Infra(#[from] InfraError),

    /// レシピ生成 Webhook
    #[error("Webhook エラー: {0}")]
    Webhook(#[from] WebhookError),

    /// メール送信・メールテンプレート
    #[error("通知エラー: {0}")]
    Notification(#[from] NotificationError),

    /// ページテンプレート
    #[error("描画エラー: {0}")]
    Render(#[from] tera::Error),
}

/// ルートごとのクライアント向け文言
#[derive(Debug, Clone, Copy)]
pub struct RouteMessages {
    /// 400 の文言
    pub bad_request: &'static str,
    /// 500 の文言
    pub internal:    &'static str,
}

impl AppError {
    /// クライアント向けのエラーに変換する
    ///
    /// 500 になるものはここでログに出す。内部の詳細はレスポンスに載せない。
    pub fn into_api_error(self, messages: RouteMessages) -> ApiError {
        match self {
            AppError::Validation(_) | AppError::Domain(DomainError::Validation(_)) => {
                ApiError::bad_request(messages.bad_request)
            }
            AppError::Unauthorized => ApiError::unauthorized(),
            AppError::NotFound => ApiError::not_found(),
            other => {
                let (category, kind) = other.log_fields();
                tracing::error!(
                    error.category = category,
                    error.kind = kind,
                    "{}",
                    other
                );
                ApiError::internal(messages.internal)
            }
        }
    }

    fn log_fields(&self) -> (&'static str, &'static str) {
        match self {
            AppError::Infra(e) => match e.kind() {
                InfraErrorKind::Database(_) => ("infrastructure", "database"),
                InfraErrorKind::Redis(_) => ("infrastructure", "session"),
                InfraErrorKind::Serialization(_) => ("infrastructure", "serialization"),
                InfraErrorKind::Unexpected(_) => ("infrastructure", "internal"),
            },
            AppError::Webhook(_) => ("external_service", "recipe_webhook"),
            AppError::Notification(_) => ("external_service", "notification"),
            AppError::Render(_) => ("internal", "template"),
            _ => ("internal", "internal"),
        }
    }
}

/// クライアントへ返すエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    body:   ErrorResponse,
}

impl ApiError {
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body:   ErrorResponse::new(message),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body:   ErrorResponse::authentication_required(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body:   ErrorResponse::not_found(),
        }
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body:   ErrorResponse::new(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const MESSAGES: RouteMessages = RouteMessages {
        bad_request: "Please provide a recipe name.",
        internal:    "Something went wrong.",
    };

    #[rstest]
    #[case::入力不正(AppError::Validation("empty".to_string()), StatusCode::BAD_REQUEST)]
    #[case::ドメイン検証(
        AppError::Domain(DomainError::Validation("empty".to_string())),
        StatusCode::BAD_REQUEST
    )]
    #[case::未認証(AppError::Unauthorized, StatusCode::UNAUTHORIZED)]
    #[case::未検出(AppError::NotFound, StatusCode::NOT_FOUND)]
    #[case::webhook(AppError::Webhook(WebhookError::Timeout), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case::インフラ(
        AppError::Infra(InfraError::unexpected("boom")),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn test_エラー種別ごとのステータス(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_api_error(MESSAGES).status(), expected);
    }

    #[test]
    fn test_500はルートの文言だけを返す() {
        let api_error =
            AppError::Infra(InfraError::unexpected("connection refused")).into_api_error(MESSAGES);

        assert_eq!(api_error, ApiError::internal("Something went wrong."));
    }

    #[test]
    fn test_400はルートの文言を返す() {
        let api_error = AppError::Validation("blank".to_string()).into_api_error(MESSAGES);

        assert_eq!(api_error, ApiError::bad_request("Please provide a recipe name."));
    }
}
