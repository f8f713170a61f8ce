//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` でメールを送る。
//! 開発環境ではローカルの SMTP キャッチャー（Mailpit など）に接続する。

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart},
};
use recipebox_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// SMTP 通知送信
pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from:      Mailbox,
}

impl SmtpNotificationSender {
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名
    /// - `port`: SMTP サーバーのポート番号（Mailpit は 1025）
    /// - `from_address`: 送信元メールアドレス
    ///
    /// # エラー
    ///
    /// 送信元アドレスが解析できない場合は `NotificationError::SendFailed`。
    pub fn new(host: &str, port: u16, from_address: &str) -> Result<Self, NotificationError> {
        let from = from_address
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::SendFailed(format!("送信元アドレス不正: {e}")))?;

        // TLS なし（ローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    #[tracing::instrument(skip_all, fields(to = %email.to))]
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        tracing::debug!("SMTP 送信完了");
        Ok(())
    }
}
