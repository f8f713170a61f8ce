//! # RecipeBox 共有ユーティリティ
//!
//! Web アプリとインフラ層の両方から使う、ビジネスロジックを含まない部品。
//!
//! - [`error_response`] - `{ "error": string }` 形式のエラー本文
//! - [`health`] - ヘルスチェックのレスポンス型
//! - [`observability`] - トレーシング初期化と Request ID（`observability` feature）

pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
