//! # RecipeBox ドメイン層
//!
//! レシピ生成アプリケーションのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: GeneratedRecipe, Favorite）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（例: Email, Ingredient）
//! - **ドメインサービス**: エンティティに属さないロジック（例: Webhook 応答の正規化）
//! - **ドメインエラー**: ルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! web → infra → domain
//!   ↘            ↑
//!     ───────────
//! ```
//!
//! ドメイン層はインフラ層（DB、Redis、外部 API）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメインエラー
//! - [`favorite`] - お気に入り
//! - [`notification`] - メール通知
//! - [`recipe`] - 生成レシピ・構造化レシピ・本文正規化
//! - [`user`] - ユーザーとメールアドレス
//!
//! ## 使用例
//!
//! ```rust
//! use recipebox_domain::recipe::content::normalize_webhook_response;
//!
//! let html = normalize_webhook_response("# Pancakes");
//! assert!(html.contains("<h1>Pancakes</h1>"));
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod favorite;
pub mod notification;
pub mod recipe;
pub mod user;

pub use error::DomainError;
