//! # 通知
//!
//! メール送信に関するドメインモデル。
//! 現状の通知はマジックリンクのサインインメールのみ。
//!
//! テンプレートのレンダリングは Web アプリ側、送信はインフラ層の
//! `NotificationSender` 実装が担う。ここでは両者の間を流れる値だけを定義する。

use thiserror::Error;

use crate::user::Email;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// マジックリンク送信依頼
///
/// メールテンプレートに渡すコンテキストの元になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicLinkNotification {
    /// 送信先
    pub recipient:      Email,
    /// `{base_url}/auth/callback?token=...` 形式のサインイン URL
    pub sign_in_url:    String,
    /// リンクの有効期間（分）
    pub expires_in_min: i64,
}

impl MagicLinkNotification {
    /// 件名
    pub fn subject(&self) -> &'static str {
        "Your RecipeBox sign-in link"
    }
}
