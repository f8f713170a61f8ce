//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置し、親モジュールで re-export する
//! - ハンドラは入出力の変換だけを行い、ロジックはユースケースに委譲する
//! - 失敗はルートごとの [`RouteMessages`](crate::error::RouteMessages) で
//!   クライアント向けの文言に変換する
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `chat`: レシピ生成（`POST /api/chat`）
//! - `recipe`: 構造化レシピの投入・一覧（`/api/recipes`）
//! - `favorite`: お気に入り（`/api/favorites`）
//! - `auth`: マジックリンク認証
//! - `page`: サーバー描画ページ

pub mod auth;
pub mod chat;
pub mod favorite;
pub mod health;
pub mod page;
pub mod recipe;

pub use auth::{AuthState, auth_callback, current_session, logout, request_magic_link};
pub use chat::{ChatState, chat};
pub use favorite::{
    FavoriteState,
    create_favorite,
    delete_favorite,
    get_favorite,
    list_favorites,
    toggle_favorite,
};
pub use health::{ReadinessState, health_check, readiness_check};
pub use page::{
    PageState,
    delete_favorite_page,
    favorite_page,
    favorites_page,
    index_page,
    recipes_page,
};
pub use recipe::{RecipeState, ingest_recipe, list_recipes};
