//! # Request ID 伝播
//!
//! 受信リクエストの Request ID をレシピ生成 Webhook への呼び出しに引き継ぐ。
//!
//! 1. [`store_request_id`] が `SetRequestIdLayer` の付けた
//!    [`RequestId`](tower_http::request_id::RequestId) を task-local に置く
//! 2. [`inject_request_id`] が reqwest の `RequestBuilder` に
//!    `X-Request-Id` ヘッダーとして載せる
//!
//! ユースケースのシグネチャに Request ID を通さずに済む。

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use recipebox_shared::observability::REQUEST_ID_HEADER;
use tower_http::request_id::RequestId;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 現在のリクエストの Request ID
///
/// task-local スコープ外（バックグラウンド処理やテスト）では `None`。
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// Request ID を task-local に保存するミドルウェア
pub async fn store_request_id(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
        .to_string();

    REQUEST_ID.scope(request_id, next.run(request)).await
}

/// Webhook へのリクエストに `X-Request-Id` を付ける
pub fn inject_request_id(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match current_request_id() {
        Some(id) => builder.header(REQUEST_ID_HEADER, id),
        None => builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_スコープ外ではnoneを返す() {
        assert_eq!(current_request_id(), None);
    }

    #[tokio::test]
    async fn test_スコープ内ではwebhook呼び出しにヘッダーが付く() {
        let client = reqwest::Client::new();

        let request = REQUEST_ID
            .scope("0192f1a0-request".to_string(), async {
                inject_request_id(client.post("http://hooks.example.com/recipe"))
                    .build()
                    .unwrap()
            })
            .await;

        assert_eq!(
            request.headers().get("x-request-id").unwrap(),
            "0192f1a0-request"
        );
    }

    #[tokio::test]
    async fn test_スコープ外ではヘッダーを付けない() {
        let client = reqwest::Client::new();

        let request = inject_request_id(client.post("http://hooks.example.com/recipe"))
            .build()
            .unwrap();

        assert!(request.headers().get("x-request-id").is_none());
    }
}
