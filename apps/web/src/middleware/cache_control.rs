//! # キャッシュ制御ミドルウェア
//!
//! セッションごとに内容が変わるページと API がブラウザや中間プロキシに
//! 残らないよう、`Cache-Control: no-store` を付与する。

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// レスポンスに `Cache-Control: no-store` を付与する
pub async fn no_cache(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
