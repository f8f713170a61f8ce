//! # メールテンプレートレンダラー
//!
//! tera でマジックリンクのメールを HTML / plaintext の両形式で生成する。
//! テンプレートは `include_str!` でバイナリに埋め込む。

use recipebox_domain::notification::{EmailMessage, MagicLinkNotification, NotificationError};
use tera::{Context, Tera};

/// メールテンプレートレンダラー
pub struct MailRenderer {
    engine: Tera,
}

impl MailRenderer {
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "magic_link.html",
                    include_str!("../../../templates/mail/magic_link.html"),
                ),
                (
                    "magic_link.txt",
                    include_str!("../../../templates/mail/magic_link.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// マジックリンク通知からメールメッセージを生成する
    pub fn render_magic_link(
        &self,
        notification: &MagicLinkNotification,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("sign_in_url", &notification.sign_in_url);
        context.insert("expires_in_min", &notification.expires_in_min);

        let html_body = self
            .engine
            .render("magic_link.html", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render("magic_link.txt", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: notification.recipient.to_string(),
            subject: notification.subject().to_string(),
            html_body,
            text_body,
        })
    }
}
