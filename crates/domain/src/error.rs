//! # ドメイン層エラー定義
//!
//! ルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//!
//! ## 使用例
//!
//! ```rust
//! use recipebox_domain::DomainError;
//!
//! fn validate_name(name: &str) -> Result<(), DomainError> {
//!     if name.is_empty() {
//!         return Err(DomainError::Validation("名前は必須です".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 必須フィールドの欠落や不正なフォーマットなど。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
