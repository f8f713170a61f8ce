//! # 外部 API クライアント
//!
//! - [`recipe_webhook`]: レシピ生成 Webhook

pub mod recipe_webhook;

pub use recipe_webhook::{RecipeWebhookClient, RecipeWebhookClientImpl, WebhookError};
