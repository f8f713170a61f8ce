//! # Web サーバー設定
//!
//! 環境変数から Web サーバーの設定を読み込む。
//! 変数の一覧は `main.rs` のドキュメントを参照。

use std::{env, time::Duration};

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が設定されていない
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// メール送信の方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationBackend {
    /// SMTP サーバーに送る
    Smtp { host: String, port: u16 },
    /// ログに出すだけ
    Noop,
}

/// Web サーバーの設定
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// PostgreSQL 接続 URL
    pub database_url: String,
    /// Redis 接続 URL
    pub redis_url: String,
    /// レシピ生成 Webhook の URL
    pub recipe_webhook_url: String,
    /// レシピ生成 Webhook のタイムアウト
    pub recipe_webhook_timeout: Duration,
    /// メール送信の方式
    pub notification_backend: NotificationBackend,
    /// 送信元メールアドレス
    pub notification_from_address: String,
    /// マジックリンクに埋め込むベース URL
    pub app_base_url: String,
    /// セッション Cookie に Secure を付けるか（`ENV=production`）
    pub secure_cookies: bool,
}

impl WebConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// テストではプロセスの環境変数を触らずに検証するために使う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let notification_backend = match get_or("NOTIFICATION_BACKEND", "noop").as_str() {
            "smtp" => NotificationBackend::Smtp {
                host: get_or("SMTP_HOST", "localhost"),
                port: parse_number("SMTP_PORT", &get_or("SMTP_PORT", "1025"))?,
            },
            "noop" => NotificationBackend::Noop,
            other => {
                return Err(ConfigError::Invalid {
                    name:  "NOTIFICATION_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let timeout_secs: u64 = parse_number(
            "RECIPE_WEBHOOK_TIMEOUT_SECS",
            &get_or("RECIPE_WEBHOOK_TIMEOUT_SECS", "120"),
        )?;

        Ok(Self {
            host: get_or("WEB_HOST", "0.0.0.0"),
            port: parse_number("WEB_PORT", &get_or("WEB_PORT", "3000"))?,
            database_url: required("DATABASE_URL")?,
            redis_url: get_or("REDIS_URL", "redis://localhost:6379"),
            recipe_webhook_url: required("RECIPE_WEBHOOK_URL")?,
            recipe_webhook_timeout: Duration::from_secs(timeout_secs),
            notification_backend,
            notification_from_address: get_or(
                "NOTIFICATION_FROM_ADDRESS",
                "noreply@recipebox.example.com",
            ),
            app_base_url: get_or("APP_BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            secure_cookies: lookup("ENV").is_some_and(|v| v == "production"),
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}
