//! # Redis 接続管理
//!
//! `ConnectionManager` は内部で再接続を行う多重化接続。
//! clone は安価なので、起動時に 1 つ作ってセッション管理とマジックリンク保存で共有する。

use redis::aio::ConnectionManager;

use crate::error::InfraError;

/// Redis 接続マネージャを作成する
///
/// # 引数
///
/// * `redis_url` - `redis://host:port` 形式の URL
pub async fn create_connection_manager(redis_url: &str) -> Result<ConnectionManager, InfraError> {
    let client = redis::Client::open(redis_url)?;
    let conn = ConnectionManager::new(client).await?;
    Ok(conn)
}

/// 接続確認（Readiness Check 用）
pub async fn ping(conn: &ConnectionManager) -> Result<(), InfraError> {
    let mut conn = conn.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(())
}
