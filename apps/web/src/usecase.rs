//! # ユースケース層
//!
//! Web アプリのビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・ストア・外部クライアントを `Arc<dyn Trait>` で注入
//! - **薄いハンドラ**: ハンドラは入出力の変換だけを行い、ロジックはここに置く
//! - **時刻**: `created_at` は注入した [`Clock`](recipebox_domain::clock::Clock) から取る
//!
//! ## モジュール構成
//!
//! - [`auth`]: マジックリンク発行・サインイン・サインアウト
//! - [`favorite`]: お気に入りの一覧・追加・トグル・削除
//! - [`recipe_generation`]: Webhook によるレシピ生成
//! - [`recipe_ingestion`]: 構造化レシピの投入・一覧

pub mod auth;
pub mod favorite;
pub mod recipe_generation;
pub mod recipe_ingestion;

pub use auth::{AuthUseCaseImpl, MailRenderer};
pub use favorite::{FavoriteUseCaseImpl, SaveFavoriteInput};
pub use recipe_generation::RecipeGenerationUseCaseImpl;
pub use recipe_ingestion::RecipeIngestionUseCaseImpl;
