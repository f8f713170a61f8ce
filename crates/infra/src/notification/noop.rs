//! Noop 通知送信実装
//!
//! メールを送らずにログだけ出す。開発環境ではサインイン URL をログから拾える。

use async_trait::async_trait;
use recipebox_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// Noop 通知送信（ログ出力のみ）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.text_body,
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}
