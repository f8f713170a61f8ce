//! # レシピ生成 Webhook クライアント
//!
//! 外部の自動化サービスに `{ "Prompt": <text> }` を POST し、
//! 返ってきた本文をテキストのまま受け取る。本文の形式は決まっておらず、
//! HTML・Markdown・プレーンテキストのいずれもあり得る。
//!
//! リトライはしない。非 2xx はそのままエラーにする。

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::middleware::request_id::inject_request_id;

/// Webhook クライアントエラー
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    /// ネットワークエラー
    #[error("ネットワークエラー: {0}")]
    Network(String),

    /// タイムアウト
    #[error("Webhook の応答がタイムアウトしました")]
    Timeout,

    /// 2xx 以外のステータス
    #[error("予期しないステータス {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

impl From<reqwest::Error> for WebhookError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WebhookError::Timeout
        } else {
            WebhookError::Network(err.to_string())
        }
    }
}

/// Webhook へのリクエスト本文
#[derive(Debug, Serialize)]
struct PromptRequest<'a> {
    #[serde(rename = "Prompt")]
    prompt: &'a str,
}

/// レシピ生成 Webhook クライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait RecipeWebhookClient: Send + Sync {
    /// プロンプトを送り、生成された本文を返す
    async fn generate(&self, prompt: &str) -> Result<String, WebhookError>;
}

/// レシピ生成 Webhook クライアント実装
pub struct RecipeWebhookClientImpl {
    url:    String,
    client: reqwest::Client,
}

impl RecipeWebhookClientImpl {
    /// # 引数
    ///
    /// - `url`: Webhook の URL（固定）
    /// - `timeout`: 1 回の呼び出し全体のタイムアウト
    pub fn new(url: &str, timeout: Duration) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl RecipeWebhookClient for RecipeWebhookClientImpl {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn generate(&self, prompt: &str) -> Result<String, WebhookError> {
        let request = self.client.post(&self.url).json(&PromptRequest { prompt });
        let response = inject_request_id(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(WebhookError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
