//! # RecipeBox Web ライブラリ
//!
//! レシピ生成・お気に入り・マジックリンク認証を提供する Web サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: DI とルーター構築
//! - `client`: 外部 API クライアント（レシピ生成 Webhook）
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラー型とクライアント向け応答
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（セッションゲート、Request ID 等）
//! - `usecase`: ユースケース
//! - `view`: tera によるページ描画

pub mod app_builder;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
pub mod view;
