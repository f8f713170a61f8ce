//! # RecipeBox インフラ層
//!
//! PostgreSQL・Redis・SMTP との接続と通信を担当する。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL の接続プールとマイグレーション
//! - **Redis 接続**: セッションとマジックリンクトークンの保存
//! - **リポジトリ実装**: 生成レシピ・構造化レシピ・お気に入り・ユーザー
//! - **メール送信**: SMTP / Noop
//!
//! ## 依存関係
//!
//! ```text
//! web → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL 接続プール
//! - [`redis`] - Redis 接続マネージャ
//! - [`error`] - インフラ層エラー
//! - [`magic_link`] - マジックリンクトークンストア
//! - [`notification`] - メール送信
//! - [`repository`] - リポジトリ
//! - [`session`] - セッション管理
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use recipebox_infra::{db, redis, session::RedisSessionManager};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/recipebox").await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let conn = redis::create_connection_manager("redis://localhost:6379").await?;
//!     let sessions = RedisSessionManager::new(conn);
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod magic_link;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod redis;
pub mod repository;
pub mod session;

pub use error::{InfraError, InfraErrorKind};
pub use magic_link::{MagicLinkStore, RedisMagicLinkStore};
pub use session::{RedisSessionManager, SessionData, SessionManager};
