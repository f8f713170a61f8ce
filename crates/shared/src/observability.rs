//! # Observability 基盤
//!
//! トレーシング初期化、ログ出力形式、Request ID 関連の部品を提供する。
//!
//! - `LOG_FORMAT` による JSON / Pretty 出力の切り替え
//! - `RUST_LOG` によるフィルタ（未設定時は `info,recipebox=debug`）
//! - [`MakeRequestUuidV7`]: `SetRequestIdLayer` 用の UUID v7 生成器
//! - [`make_request_span`]: `TraceLayer` 用のスパン生成関数（`request_id` を含む）

/// Request ID を運ぶ HTTP ヘッダー名
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,recipebox=debug";

/// ログ出力形式
///
/// 環境変数 `LOG_FORMAT` で切り替える。
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（本番環境向け）
    Json,
    /// 人間が読みやすい形式（開発環境向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式をパースする
    ///
    /// 大文字小文字と前後の空白は無視する。不正な値は stderr に警告を出して
    /// [`Pretty`](LogFormat::Pretty) にする（subscriber 初期化前なので tracing は使えない）。
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|val| Self::parse(&val))
            .unwrap_or_default()
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（ルートスパンの `service` フィールドに使う）
    pub service_name: String,
    /// ログ出力形式
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    /// `LOG_FORMAT` 環境変数から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// トレーシングを初期化する
///
/// `ErrorLayer` を登録するので、インフラ層のエラーが捕捉する `SpanTrace` に
/// 発生箇所のスパンが記録される。
///
/// JSON モードでは `timestamp`, `level`, `target`, `message` と
/// 現在のスパン（`request_id` など）がトップレベルに出力される。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::debug!(
        service = %config.service_name,
        log_format = ?config.log_format,
        "トレーシングを初期化しました"
    );
}

/// UUID v7 の Request ID を生成する `MakeRequestId` 実装
///
/// クライアントが `X-Request-Id` を送ってきた場合は `SetRequestIdLayer` が
/// そちらを優先するので、これは未指定時にだけ呼ばれる。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        http::HeaderValue::from_str(&id)
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// リクエストごとのスパンを作る
///
/// `TraceLayer::make_span_with` に渡す。`SetRequestIdLayer` より内側で
/// 呼ばれる前提で、ヘッダーから Request ID を読む。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri().path(),
        request_id = %request_id,
    )
}
