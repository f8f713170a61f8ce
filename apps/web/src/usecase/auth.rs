//! # 認証ユースケース
//!
//! メールのマジックリンクによるパスワードレス認証。
//!
//! ```text
//! POST /api/auth/magic-link ─▶ トークン発行（15 分・1 回限り）─▶ メール送信
//! GET  /auth/callback        ─▶ トークン消費 ─▶ ユーザー作成/取得 ─▶ セッション作成
//! POST /api/auth/logout      ─▶ セッション削除
//! ```
//!
//! ## モジュール構成
//!
//! - [`mail_renderer`] - tera によるサインインメール生成

pub mod mail_renderer;

use std::sync::Arc;

pub use mail_renderer::MailRenderer;
use recipebox_domain::{clock::Clock, notification::MagicLinkNotification, user::Email};
use recipebox_infra::{
    MagicLinkStore,
    SessionData,
    SessionManager,
    magic_link::MAGIC_LINK_TTL_SECONDS,
    notification::NotificationSender,
    repository::UserRepository,
};

use crate::error::AppError;

/// 認証ユースケース
pub struct AuthUseCaseImpl {
    magic_links:     Arc<dyn MagicLinkStore>,
    sender:          Arc<dyn NotificationSender>,
    mail_renderer:   MailRenderer,
    user_repository: Arc<dyn UserRepository>,
    session_manager: Arc<dyn SessionManager>,
    clock:           Arc<dyn Clock>,
    base_url:        String,
}

impl AuthUseCaseImpl {
    pub fn new(
        magic_links: Arc<dyn MagicLinkStore>,
        sender: Arc<dyn NotificationSender>,
        mail_renderer: MailRenderer,
        user_repository: Arc<dyn UserRepository>,
        session_manager: Arc<dyn SessionManager>,
        clock: Arc<dyn Clock>,
        base_url: String,
    ) -> Self {
        Self {
            magic_links,
            sender,
            mail_renderer,
            user_repository,
            session_manager,
            clock,
            base_url,
        }
    }

    /// マジックリンクを発行してメールで送る
    ///
    /// メールアドレスが不正なら `Validation`。トークンは送信に成功しなくても
    /// TTL で消えるので、失敗時に取り消しはしない。
    pub async fn request_magic_link(&self, email: Option<&str>) -> Result<(), AppError> {
        let email = Email::new(email.unwrap_or_default())?;

        let token = self.magic_links.issue(&email).await?;
        let notification = MagicLinkNotification {
            recipient:      email,
            sign_in_url:    format!(
                "{}/auth/callback?token={}",
                self.base_url,
                urlencoding::encode(&token)
            ),
            expires_in_min: (MAGIC_LINK_TTL_SECONDS / 60) as i64,
        };

        let message = self.mail_renderer.render_magic_link(&notification)?;
        self.sender.send_email(&message).await?;

        tracing::info!("マジックリンクを送信しました");
        Ok(())
    }

    /// トークンを消費してセッションを作る
    ///
    /// 未知・期限切れ・使用済みのトークンは `Ok(None)`。
    /// 成功時は新しいセッション ID を返す。
    pub async fn sign_in(&self, token: &str) -> Result<Option<String>, AppError> {
        let Some(email) = self.magic_links.consume(token).await? else {
            tracing::info!("無効なマジックリンクトークン");
            return Ok(None);
        };

        let now = self.clock.now();
        let user = self
            .user_repository
            .find_or_create_by_email(&email, now)
            .await?;

        let session = SessionData::new(user.id().clone(), email, now);
        let session_id = self.session_manager.create(&session).await?;

        tracing::info!(user.id = %user.id(), "サインインしました");
        Ok(Some(session_id))
    }

    /// セッションを削除する
    pub async fn sign_out(&self, session_id: &str) -> Result<(), AppError> {
        self.session_manager.delete(session_id).await?;
        Ok(())
    }
}
