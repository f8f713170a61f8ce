//! Web アプリのルーター統合テスト
//!
//! `build_app` で組み立てたルーター全体に対してリクエストを送る。
//! PostgreSQL・Redis・SMTP・Webhook はすべてモック/スタブに置き換える。
//!
//! ## 実行方法
//!
//! ```bash
//! cargo test -p recipebox-web --test app_test
//! ```
//!
//! ## テストケース
//!
//! - 共通ヘッダー（Cache-Control, X-Request-Id）
//! - レシピ生成: 入力なしは 400、Markdown 応答は HTML 化、Webhook 失敗は 500
//! - 構造化レシピ: `output.recipe` なしは 400、緩い型の材料も保存、一覧は新しい順
//! - セッションゲート: ページはリダイレクト、API は 401
//! - お気に入り: トグル 2 回で元に戻る、他人のものは削除できない
//! - マジックリンク → コールバック → セッション → ログアウト

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use recipebox_domain::{
    clock::Clock,
    favorite::{FavoriteTitle, NewFavorite},
    user::{Email, UserId},
};
use recipebox_infra::{
    SessionData,
    mock::{
        MockFavoriteRepository,
        MockGeneratedRecipeRepository,
        MockMagicLinkStore,
        MockNotificationSender,
        MockSessionManager,
        MockStructuredRecipeRepository,
        MockUserRepository,
    },
};
use recipebox_web::{
    app_builder::{AppDependencies, build_app},
    client::{RecipeWebhookClient, WebhookError},
    config::WebConfig,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const SESSION_ID: &str = "test-session";

// --- Webhook スタブ ---

struct StubWebhook {
    reply:   Result<String, WebhookError>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl RecipeWebhookClient for StubWebhook {
    async fn generate(&self, prompt: &str) -> Result<String, WebhookError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

/// 呼ばれるたびに 1 分進む時計
struct TickingClock {
    next: Mutex<DateTime<Utc>>,
}

impl Clock for TickingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + Duration::minutes(1);
        now
    }
}

// --- テストハーネス ---

struct Harness {
    app:        Router,
    webhook:    Arc<StubWebhook>,
    generated:  MockGeneratedRecipeRepository,
    structured: MockStructuredRecipeRepository,
    favorites:  MockFavoriteRepository,
    sessions:   MockSessionManager,
    links:      MockMagicLinkStore,
    sender:     MockNotificationSender,
    user_id:    UserId,
}

impl Harness {
    fn new() -> Self {
        Self::with_webhook_reply(Ok("# Miso Soup\n\nSimmer dashi.".to_string()))
    }

    fn with_webhook_reply(reply: Result<String, WebhookError>) -> Self {
        let config = WebConfig::from_lookup(|name: &str| match name {
            "DATABASE_URL" => Some("postgres://localhost/recipebox".to_string()),
            "RECIPE_WEBHOOK_URL" => Some("https://hooks.example.com/recipe".to_string()),
            "APP_BASE_URL" => Some("http://localhost:3000".to_string()),
            _ => None,
        })
        .unwrap();

        let webhook = Arc::new(StubWebhook {
            reply,
            prompts: Mutex::new(Vec::new()),
        });
        let generated = MockGeneratedRecipeRepository::new();
        let structured = MockStructuredRecipeRepository::new();
        let favorites = MockFavoriteRepository::new();
        let sessions = MockSessionManager::new();
        let links = MockMagicLinkStore::new();
        let sender = MockNotificationSender::new();

        let user_id = UserId::new();
        sessions.insert(
            SESSION_ID,
            SessionData::new(
                user_id.clone(),
                Email::new("chef@example.com").unwrap(),
                Utc::now(),
            ),
        );

        let deps = AppDependencies {
            generated_recipes:   Arc::new(generated.clone()),
            structured_recipes:  Arc::new(structured.clone()),
            favorites:           Arc::new(favorites.clone()),
            users:               Arc::new(MockUserRepository::new()),
            session_manager:     Arc::new(sessions.clone()),
            magic_links:         Arc::new(links.clone()),
            notification_sender: Arc::new(sender.clone()),
            recipe_webhook:      webhook.clone(),
            clock:               Arc::new(TickingClock {
                next: Mutex::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()),
            }),
        };

        Self {
            app: build_app(&config, deps, None).unwrap(),
            webhook,
            generated,
            structured,
            favorites,
            sessions,
            links,
            sender,
            user_id,
        }
    }

    async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

fn json_request(method: Method, uri: &str, body: Value, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(id) = session {
        builder = builder.header(header::COOKIE, format!("session_id={id}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(id) = session {
        builder = builder.header(header::COOKIE, format!("session_id={id}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

// --- 共通ヘッダー ---

#[tokio::test]
async fn test_全レスポンスにno_storeとrequest_idが付く() {
    let harness = Harness::new();

    let response = harness.send(get_request("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    assert!(response.headers().contains_key("x-request-id"));
}

// --- レシピ生成 ---

#[tokio::test]
async fn test_レシピ名なしは400でwebhookを呼ばない() {
    let harness = Harness::new();

    let response = harness
        .send(json_request(Method::POST, "/api/chat", json!({ "message": "  " }), None))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Please provide a recipe name." })
    );
    assert!(harness.webhook.prompts.lock().unwrap().is_empty());
    assert!(harness.generated.saved().is_empty());
}

#[tokio::test]
async fn test_markdown応答はhtmlにして保存し返す() {
    let harness = Harness::new();

    let response = harness
        .send(json_request(
            Method::POST,
            "/api/chat",
            json!({ "message": "Miso Soup" }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["html"].as_str().unwrap().contains("<h1>Miso Soup</h1>"));
    let saved = harness.generated.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(body["id"], saved[0].id().to_string());
    assert_eq!(*harness.webhook.prompts.lock().unwrap(), vec!["Miso Soup"]);
}

#[tokio::test]
async fn test_webhook失敗は500で何も保存しない() {
    let harness = Harness::with_webhook_reply(Err(WebhookError::UnexpectedStatus {
        status: 502,
        body:   "Bad Gateway".to_string(),
    }));

    let response = harness
        .send(json_request(
            Method::POST,
            "/api/chat",
            json!({ "message": "Miso Soup" }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Something went wrong." })
    );
    assert_eq!(*harness.webhook.prompts.lock().unwrap(), vec!["Miso Soup"]);
    assert!(harness.generated.saved().is_empty());
}

#[tokio::test]
async fn test_前後に空白のあるレシピ名はそのまま送って保存する() {
    let harness = Harness::new();

    let response = harness
        .send(json_request(
            Method::POST,
            "/api/chat",
            json!({ "message": " Miso Soup  " }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*harness.webhook.prompts.lock().unwrap(), vec![" Miso Soup  "]);
    assert_eq!(harness.generated.saved()[0].title(), " Miso Soup  ");
}

// --- 構造化レシピ ---

#[tokio::test]
async fn test_recipeのない投入は400() {
    let harness = Harness::new();

    let response = harness
        .send(json_request(Method::POST, "/api/recipes", json!({ "output": {} }), None))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "No recipe found in request" })
    );
}

#[tokio::test]
async fn test_nameのないrecipeは400() {
    let harness = Harness::new();

    let response = harness
        .send(json_request(
            Method::POST,
            "/api/recipes",
            json!({ "output": { "recipe": { "cuisine": "Thai" } } }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(harness.structured.saved().is_empty());
}

#[tokio::test]
async fn test_投入したレシピはcamelcaseで返り省略項目はnullと空リストになる() {
    let harness = Harness::new();

    let response = harness
        .send(json_request(
            Method::POST,
            "/api/recipes",
            json!({ "output": { "recipe": {
                "name": "Pad Thai",
                "cuisine": "",
                "prep_time_minutes": 15,
                "cook_time_minutes": 0
            } } }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let saved = harness.structured.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(body["id"], saved[0].id.to_string());
    assert_eq!(body["name"], "Pad Thai");
    assert_eq!(body["cuisine"], Value::Null);
    assert_eq!(body["prepTime"], 15);
    assert_eq!(body["cookTime"], Value::Null);
    assert_eq!(body["difficulty"], Value::Null);
    assert_eq!(body["dietaryTags"], json!([]));
    assert_eq!(body["ingredients"], json!([]));
    assert_eq!(body["steps"], json!([]));
    assert_eq!(body["createdAt"], "2026-03-01T09:00:00Z");
    assert!(body.get("prep_time").is_none());
}

#[tokio::test]
async fn test_型の緩い材料もそのまま保存する() {
    let harness = Harness::new();

    let response = harness
        .send(json_request(
            Method::POST,
            "/api/recipes",
            json!({ "output": { "recipe": {
                "name": "Salad",
                "ingredients": [
                    { "name": "salt", "amount": "to taste", "unit": "" },
                    { "name": "lettuce" }
                ]
            } } }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let expected = json!([
        { "name": "salt", "amount": "to taste", "unit": "" },
        { "name": "lettuce" }
    ]);
    assert_eq!(body_json(response).await["ingredients"], expected);
    assert_eq!(
        serde_json::to_value(&harness.structured.saved()[0].ingredients).unwrap(),
        expected
    );
}

#[tokio::test]
async fn test_レシピ一覧は新しい順() {
    let harness = Harness::new();
    for name in ["First", "Second", "Third"] {
        let response = harness
            .send(json_request(
                Method::POST,
                "/api/recipes",
                json!({ "output": { "recipe": { "name": name } } }),
                None,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = harness.send(get_request("/api/recipes", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);
}

// --- セッションゲート ---

#[tokio::test]
async fn test_未認証のページはトップへリダイレクトする() {
    let harness = Harness::new();

    let response = harness.send(get_request("/favorites", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_未認証のapiは401() {
    let harness = Harness::new();

    let response = harness
        .send(get_request("/api/favorites", Some("unknown-session")))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Authentication required" })
    );
}

#[tokio::test]
async fn test_認証済みならページを描画する() {
    let harness = Harness::new();

    let response = harness.send(get_request("/recipes", Some(SESSION_ID))).await;

    assert_eq!(response.status(), StatusCode::OK);
}

// --- お気に入り ---

#[tokio::test]
async fn test_同じタイトルを2回トグルすると元に戻る() {
    let harness = Harness::new();
    let body = json!({ "title": "Miso Soup", "content": "<h1>Miso</h1>" });

    let first = harness
        .send(json_request(
            Method::POST,
            "/api/favorites/toggle",
            body.clone(),
            Some(SESSION_ID),
        ))
        .await;
    assert_eq!(body_json(first).await["status"], "added");

    let second = harness
        .send(json_request(
            Method::POST,
            "/api/favorites/toggle",
            body,
            Some(SESSION_ID),
        ))
        .await;
    assert_eq!(body_json(second).await["status"], "removed");

    assert!(harness.favorites.all().is_empty());
}

#[tokio::test]
async fn test_本文なしのお気に入りは400() {
    let harness = Harness::new();

    let response = harness
        .send(json_request(
            Method::POST,
            "/api/favorites",
            json!({ "title": "Empty" }),
            Some(SESSION_ID),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Content is required" }));
}

#[tokio::test]
async fn test_他人のお気に入りは削除できない() {
    let harness = Harness::new();
    let others = NewFavorite::new(
        UserId::new(),
        FavoriteTitle::new(Some("Ramen")),
        "<p>Noodles</p>".to_string(),
        None,
        Utc::now(),
    )
    .unwrap()
    .into_saved();
    harness.favorites.add_favorite(others.clone());

    let response = harness
        .send(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/favorites/{}", others.id))
                .header(header::COOKIE, format!("session_id={SESSION_ID}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(harness.favorites.all().len(), 1);
}

#[tokio::test]
async fn test_ページからの削除は一覧へ戻る() {
    let harness = Harness::new();
    let mine = NewFavorite::new(
        harness.user_id.clone(),
        FavoriteTitle::new(Some("Udon")),
        "<p>Thick noodles</p>".to_string(),
        None,
        Utc::now(),
    )
    .unwrap()
    .into_saved();
    harness.favorites.add_favorite(mine.clone());

    let response = harness
        .send(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/favorites/{}/delete", mine.id))
                .header(header::COOKIE, format!("session_id={SESSION_ID}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/favorites");
    assert!(harness.favorites.all().is_empty());
}

// --- マジックリンク認証 ---

#[tokio::test]
async fn test_マジックリンクからセッションを作りログアウトする() {
    let harness = Harness::new();

    let requested = harness
        .send(json_request(
            Method::POST,
            "/api/auth/magic-link",
            json!({ "email": "cook@example.com" }),
            None,
        ))
        .await;
    assert_eq!(requested.status(), StatusCode::ACCEPTED);
    assert_eq!(harness.sender.sent_emails().len(), 1);

    let token = harness.links.pending_tokens().remove(0);
    let callback = harness
        .send(get_request(&format!("/auth/callback?token={token}"), None))
        .await;
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), "/recipes");
    let set_cookie = callback
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    let session_id = set_cookie
        .trim_start_matches("session_id=")
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let session = harness
        .send(get_request("/api/auth/session", Some(&session_id)))
        .await;
    assert_eq!(session.status(), StatusCode::OK);
    assert_eq!(body_json(session).await["email"], "cook@example.com");

    let logout = harness
        .send(json_request(
            Method::POST,
            "/api/auth/logout",
            json!({}),
            Some(&session_id),
        ))
        .await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);
    assert!(!harness.sessions.contains(&session_id));
}

#[tokio::test]
async fn test_無効なトークンはトップへ戻す() {
    let harness = Harness::new();

    let response = harness
        .send(get_request("/auth/callback?token=bogus", None))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_不正なメールアドレスは400() {
    let harness = Harness::new();

    let response = harness
        .send(json_request(
            Method::POST,
            "/api/auth/magic-link",
            json!({ "email": "nope" }),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid email address" }));
}
