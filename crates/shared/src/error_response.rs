//! # エラーレスポンス
//!
//! 全エンドポイント共通のエラー本文 `{ "error": string }`。
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - HTTP ステータスとの組み合わせと `IntoResponse` 変換は Web アプリ側の責務
//! - クライアントにはルートごとの固定文言だけを返し、内部の詳細は載せない

use serde::{Deserialize, Serialize};

/// 認証が必要なルートで未認証だった場合の文言
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";

/// エラーレスポンス本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// 401 用の本文
    pub fn authentication_required() -> Self {
        Self::new(AUTHENTICATION_REQUIRED)
    }

    /// 404 用の本文
    pub fn not_found() -> Self {
        Self::new("Not found")
    }
}
