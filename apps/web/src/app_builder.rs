//! # アプリケーション構築
//!
//! 依存（リポジトリ・ストア・クライアント）を受け取り、ユースケース → State → Router
//! の順に組み立てる。`main.rs` はインフラ初期化とサーバー起動に集中する。
//!
//! ## ルートの分類
//!
//! | 分類 | ゲート | 例 |
//! |------|--------|----|
//! | 公開 | なし | `/`, `/auth/callback`, `/api/chat`, `/api/recipes`, `/health` |
//! | 保護 API | 401 | `/api/favorites`, `/api/auth/session` |
//! | 保護ページ | `/` へリダイレクト | `/recipes`, `/favorites` |

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use recipebox_domain::clock::Clock;
use recipebox_infra::{
    MagicLinkStore,
    SessionManager,
    notification::NotificationSender,
    repository::{
        FavoriteRepository,
        GeneratedRecipeRepository,
        StructuredRecipeRepository,
        UserRepository,
    },
};
use recipebox_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    client::RecipeWebhookClient,
    config::WebConfig,
    handler::{
        AuthState,
        ChatState,
        FavoriteState,
        PageState,
        ReadinessState,
        RecipeState,
        auth_callback,
        chat,
        create_favorite,
        current_session,
        delete_favorite,
        delete_favorite_page,
        favorite_page,
        favorites_page,
        get_favorite,
        health_check,
        index_page,
        ingest_recipe,
        list_favorites,
        list_recipes,
        logout,
        readiness_check,
        recipes_page,
        request_magic_link,
        toggle_favorite,
    },
    middleware::{GateMode, SessionGateState, no_cache, request_id::store_request_id, require_session},
    usecase::{
        AuthUseCaseImpl,
        FavoriteUseCaseImpl,
        MailRenderer,
        RecipeGenerationUseCaseImpl,
        RecipeIngestionUseCaseImpl,
    },
    view::PageRenderer,
};

/// ルーター構築に必要な依存
///
/// `main.rs` では PostgreSQL / Redis / SMTP の実装を、テストではモックを渡す。
pub struct AppDependencies {
    pub generated_recipes:   Arc<dyn GeneratedRecipeRepository>,
    pub structured_recipes:  Arc<dyn StructuredRecipeRepository>,
    pub favorites:           Arc<dyn FavoriteRepository>,
    pub users:               Arc<dyn UserRepository>,
    pub session_manager:     Arc<dyn SessionManager>,
    pub magic_links:         Arc<dyn MagicLinkStore>,
    pub notification_sender: Arc<dyn NotificationSender>,
    pub recipe_webhook:      Arc<dyn RecipeWebhookClient>,
    pub clock:               Arc<dyn Clock>,
}

/// DI とルーター定義を行う
///
/// `readiness` が `None` の場合は `/health/ready` を登録しない。
///
/// # エラー
///
/// テンプレートの読み込みに失敗した場合。
pub fn build_app(
    config: &WebConfig,
    deps: AppDependencies,
    readiness: Option<Arc<ReadinessState>>,
) -> anyhow::Result<Router> {
    let chat_state = Arc::new(ChatState {
        usecase: RecipeGenerationUseCaseImpl::new(
            deps.recipe_webhook,
            deps.generated_recipes,
            deps.clock.clone(),
        ),
    });

    let recipe_state = Arc::new(RecipeState {
        usecase: RecipeIngestionUseCaseImpl::new(deps.structured_recipes, deps.clock.clone()),
    });

    let favorite_state = Arc::new(FavoriteState {
        usecase: FavoriteUseCaseImpl::new(deps.favorites.clone(), deps.clock.clone()),
    });

    let page_state = Arc::new(PageState {
        renderer:  PageRenderer::new()?,
        favorites: FavoriteUseCaseImpl::new(deps.favorites, deps.clock.clone()),
    });

    let auth_state = Arc::new(AuthState {
        usecase:        AuthUseCaseImpl::new(
            deps.magic_links,
            deps.notification_sender,
            MailRenderer::new()?,
            deps.users,
            deps.session_manager.clone(),
            deps.clock,
            config.app_base_url.clone(),
        ),
        secure_cookies: config.secure_cookies,
    });

    let api_gate = SessionGateState::new(deps.session_manager.clone(), GateMode::Api);
    let page_gate = SessionGateState::new(deps.session_manager, GateMode::Page);

    let protected_api = Router::new()
        .route("/api/favorites", get(list_favorites).post(create_favorite))
        .route("/api/favorites/toggle", post(toggle_favorite))
        .route(
            "/api/favorites/{id}",
            get(get_favorite).delete(delete_favorite),
        )
        .with_state(favorite_state)
        .merge(
            Router::new()
                .route("/api/auth/session", get(current_session))
                .with_state(auth_state.clone()),
        )
        .layer(from_fn_with_state(api_gate, require_session));

    let protected_pages = Router::new()
        .route("/recipes", get(recipes_page))
        .route("/favorites", get(favorites_page))
        .route("/favorites/{id}", get(favorite_page))
        .route("/favorites/{id}/delete", post(delete_favorite_page))
        .layer(from_fn_with_state(page_gate, require_session))
        .with_state(page_state.clone());

    let mut public = Router::new()
        .route("/health", get(health_check))
        .merge(Router::new().route("/", get(index_page)).with_state(page_state))
        .merge(
            Router::new()
                .route("/api/auth/magic-link", post(request_magic_link))
                .route("/api/auth/logout", post(logout))
                .route("/auth/callback", get(auth_callback))
                .with_state(auth_state),
        )
        .merge(Router::new().route("/api/chat", post(chat)).with_state(chat_state))
        .merge(
            Router::new()
                .route("/api/recipes", get(list_recipes).post(ingest_recipe))
                .with_state(recipe_state),
        );

    if let Some(readiness) = readiness {
        public = public.merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness),
        );
    }

    let app = Router::new()
        .merge(public)
        .merge(protected_api)
        .merge(protected_pages)
        .layer(from_fn(no_cache))
        .layer(from_fn(store_request_id))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));

    Ok(app)
}
