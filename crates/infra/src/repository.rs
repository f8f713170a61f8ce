//! # リポジトリ実装
//!
//! 各テーブルの永続化操作を trait で定義し、PostgreSQL 実装を提供する。
//! ユースケース層は trait 経由で使い、テストでは [`crate::mock`] に差し替える。
//!
//! クエリは実行時検証の `sqlx::query` / `query_as` と `FromRow` 行構造体で書く。

pub mod favorite_repository;
pub mod generated_recipe_repository;
pub mod structured_recipe_repository;
pub mod user_repository;

pub use favorite_repository::{FavoriteRepository, PostgresFavoriteRepository};
pub use generated_recipe_repository::{
    GeneratedRecipeRepository,
    PostgresGeneratedRecipeRepository,
};
pub use structured_recipe_repository::{
    PostgresStructuredRecipeRepository,
    StructuredRecipeRepository,
};
pub use user_repository::{PostgresUserRepository, UserRepository};
