//! # ヘルスチェックハンドラ
//!
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（PostgreSQL / Redis の接続状態を確認）

use std::{collections::BTreeMap, future::Future, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use recipebox_infra::{InfraError, db};
use recipebox_shared::{CheckStatus, HealthResponse, ReadinessResponse};
use redis::aio::ConnectionManager;
use sqlx::PgPool;

/// 個別チェックのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness Check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub pool:       PgPool,
    pub redis_conn: ConnectionManager,
}

/// Readiness Check
///
/// PostgreSQL と Redis を並行チェックする。全チェック OK → 200、1 つでも失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let (database, redis) = tokio::join!(
        check("database", db::ping(&state.pool)),
        check("redis", recipebox_infra::redis::ping(&state.redis_conn)),
    );

    let checks = BTreeMap::from([
        ("database".to_string(), database),
        ("redis".to_string(), redis),
    ]);
    let response = ReadinessResponse::from_checks(checks);
    let http_status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(response))
}

async fn check(name: &str, ping: impl Future<Output = Result<(), InfraError>>) -> CheckStatus {
    match tokio::time::timeout(CHECK_TIMEOUT, ping).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: {} ping failed", name);
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: {} check timed out", name);
            CheckStatus::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_healthはバージョン付きでhealthyを返す() {
        let Json(body) = health_check().await;

        assert_eq!(body, HealthResponse::healthy(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn test_失敗したチェックはerrorになる() {
        let status = check("database", async { Err(InfraError::unexpected("down")) }).await;

        assert_eq!(status, CheckStatus::Error);
    }

    #[tokio::test]
    async fn test_成功したチェックはokになる() {
        let status = check("redis", async { Ok(()) }).await;

        assert_eq!(status, CheckStatus::Ok);
    }
}
