//! # 通知送信
//!
//! メール送信を担当するインフラストラクチャモジュール。
//!
//! - `NotificationSender` trait でメール送信を抽象化
//! - SMTP（lettre）と Noop（ログ出力のみ）の 2 実装
//! - `NOTIFICATION_BACKEND` で起動時に選択

mod noop;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopNotificationSender;
use recipebox_domain::notification::{EmailMessage, NotificationError};
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
