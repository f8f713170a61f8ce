//! # RecipeBox Web サーバー
//!
//! レシピ名を外部 Webhook に送って HTML レシピを生成し、サインインしたユーザーが
//! お気に入りとして保存できるようにする。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Browser    │────▶│     Web      │────▶│   Webhook    │
//! │  (tera HTML) │     │  port: 3000  │     │ (レシピ生成) │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                        │     │     │
//!                        ▼     ▼     ▼
//!               PostgreSQL   Redis   SMTP
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `WEB_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `WEB_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `REDIS_URL` | No | Redis 接続 URL（デフォルト: `redis://localhost:6379`） |
//! | `RECIPE_WEBHOOK_URL` | **Yes** | レシピ生成 Webhook の URL |
//! | `RECIPE_WEBHOOK_TIMEOUT_SECS` | No | Webhook のタイムアウト秒（デフォルト: `120`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` または `noop`（デフォルト: `noop`） |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP サーバー（デフォルト: `localhost:1025`） |
//! | `NOTIFICATION_FROM_ADDRESS` | No | 送信元アドレス |
//! | `APP_BASE_URL` | No | マジックリンクのベース URL |
//! | `ENV` | No | `production` でセッション Cookie に Secure を付ける |
//! | `LOG_FORMAT` | No | `json` で JSON ログ |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p recipebox-web
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use recipebox_domain::clock::SystemClock;
use recipebox_infra::{
    RedisMagicLinkStore,
    RedisSessionManager,
    db,
    notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender},
    repository::{
        PostgresFavoriteRepository,
        PostgresGeneratedRecipeRepository,
        PostgresStructuredRecipeRepository,
        PostgresUserRepository,
    },
};
use recipebox_shared::observability::{TracingConfig, init_tracing};
use recipebox_web::{
    app_builder::{AppDependencies, build_app},
    client::RecipeWebhookClientImpl,
    config::{NotificationBackend, WebConfig},
    handler::ReadinessState,
};
use tokio::net::TcpListener;

/// Web サーバーのエントリーポイント
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. 設定の読み込み
/// 4. PostgreSQL・Redis・メール送信の初期化
/// 5. ルーターの構築と HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("web"));
    let _tracing_guard = tracing::info_span!("app", service = "web").entered();

    let config = WebConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!("Web サーバーを起動します: {}:{}", config.host, config.port);

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベースへの接続に失敗しました")?;
    db::run_migrations(&pool)
        .await
        .context("マイグレーションの実行に失敗しました")?;
    tracing::info!("データベースに接続しました");

    let redis_conn = recipebox_infra::redis::create_connection_manager(&config.redis_url)
        .await
        .context("Redis への接続に失敗しました")?;
    tracing::info!("Redis に接続しました");

    let notification_sender: Arc<dyn NotificationSender> = match &config.notification_backend {
        NotificationBackend::Smtp { host, port } => {
            tracing::info!("メール送信: SMTP {}:{}", host, port);
            Arc::new(
                SmtpNotificationSender::new(host, *port, &config.notification_from_address)
                    .context("SMTP 送信の初期化に失敗しました")?,
            )
        }
        NotificationBackend::Noop => {
            tracing::info!("メール送信: Noop（ログ出力のみ）");
            Arc::new(NoopNotificationSender)
        }
    };

    let recipe_webhook =
        RecipeWebhookClientImpl::new(&config.recipe_webhook_url, config.recipe_webhook_timeout)
            .context("Webhook クライアントの初期化に失敗しました")?;

    let deps = AppDependencies {
        generated_recipes: Arc::new(PostgresGeneratedRecipeRepository::new(pool.clone())),
        structured_recipes: Arc::new(PostgresStructuredRecipeRepository::new(pool.clone())),
        favorites: Arc::new(PostgresFavoriteRepository::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        session_manager: Arc::new(RedisSessionManager::new(redis_conn.clone())),
        magic_links: Arc::new(RedisMagicLinkStore::new(redis_conn.clone())),
        notification_sender,
        recipe_webhook: Arc::new(recipe_webhook),
        clock: Arc::new(SystemClock),
    };

    let readiness_state = Arc::new(ReadinessState { pool, redis_conn });

    let app = build_app(&config, deps, Some(readiness_state))?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Web サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
