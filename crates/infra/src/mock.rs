//! # テスト用モック
//!
//! ユースケース・ハンドラーのテストで使うインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! recipebox-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 各モックは `failing()` で常に失敗するインスタンスを作れる。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipebox_domain::{
    favorite::{Favorite, FavoriteId, FavoriteToggleOutcome, NewFavorite},
    notification::{EmailMessage, NotificationError},
    recipe::{
        GeneratedRecipe,
        structured::{NewStructuredRecipe, StructuredRecipe},
    },
    user::{Email, User, UserId},
};

use crate::{
    error::InfraError,
    magic_link::{MagicLinkStore, generate_token},
    notification::NotificationSender,
    repository::{
        FavoriteRepository,
        GeneratedRecipeRepository,
        StructuredRecipeRepository,
        UserRepository,
    },
    session::{SessionData, SessionManager},
};

fn injected_failure() -> InfraError {
    InfraError::unexpected("モックで注入した失敗")
}

// ===== MockGeneratedRecipeRepository =====

#[derive(Clone, Default)]
pub struct MockGeneratedRecipeRepository {
    recipes: Arc<Mutex<Vec<GeneratedRecipe>>>,
    fail:    bool,
}

impl MockGeneratedRecipeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// 保存された生成レシピ
    pub fn saved(&self) -> Vec<GeneratedRecipe> {
        self.recipes.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeneratedRecipeRepository for MockGeneratedRecipeRepository {
    async fn insert(&self, recipe: &GeneratedRecipe) -> Result<(), InfraError> {
        if self.fail {
            return Err(injected_failure());
        }
        self.recipes.lock().unwrap().push(recipe.clone());
        Ok(())
    }
}

// ===== MockStructuredRecipeRepository =====

#[derive(Clone, Default)]
pub struct MockStructuredRecipeRepository {
    recipes: Arc<Mutex<Vec<StructuredRecipe>>>,
    fail:    bool,
}

impl MockStructuredRecipeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<StructuredRecipe> {
        self.recipes.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredRecipeRepository for MockStructuredRecipeRepository {
    async fn insert(&self, recipe: &NewStructuredRecipe) -> Result<StructuredRecipe, InfraError> {
        if self.fail {
            return Err(injected_failure());
        }
        let saved = recipe.clone().into_saved();
        self.recipes.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<StructuredRecipe>, InfraError> {
        if self.fail {
            return Err(injected_failure());
        }
        let mut recipes = self.recipes.lock().unwrap().clone();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }
}

// ===== MockFavoriteRepository =====

#[derive(Clone, Default)]
pub struct MockFavoriteRepository {
    favorites: Arc<Mutex<Vec<Favorite>>>,
    fail:      bool,
}

impl MockFavoriteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn add_favorite(&self, favorite: Favorite) {
        self.favorites.lock().unwrap().push(favorite);
    }

    pub fn all(&self) -> Vec<Favorite> {
        self.favorites.lock().unwrap().clone()
    }
}

#[async_trait]
impl FavoriteRepository for MockFavoriteRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
        query: Option<&str>,
    ) -> Result<Vec<Favorite>, InfraError> {
        if self.fail {
            return Err(injected_failure());
        }
        let mut found: Vec<Favorite> = self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|f| &f.user_id == user_id && f.matches_search(query))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_id(
        &self,
        id: &FavoriteId,
        user_id: &UserId,
    ) -> Result<Option<Favorite>, InfraError> {
        if self.fail {
            return Err(injected_failure());
        }
        Ok(self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .find(|f| &f.id == id && &f.user_id == user_id)
            .cloned())
    }

    async fn insert_or_get(&self, favorite: &NewFavorite) -> Result<Favorite, InfraError> {
        if self.fail {
            return Err(injected_failure());
        }
        let mut favorites = self.favorites.lock().unwrap();
        if let Some(existing) = favorites
            .iter()
            .find(|f| &f.user_id == favorite.user_id() && f.title == favorite.title().as_str())
        {
            return Ok(existing.clone());
        }
        let saved = favorite.clone().into_saved();
        favorites.push(saved.clone());
        Ok(saved)
    }

    async fn toggle(&self, favorite: &NewFavorite) -> Result<FavoriteToggleOutcome, InfraError> {
        if self.fail {
            return Err(injected_failure());
        }
        let mut favorites = self.favorites.lock().unwrap();
        if let Some(pos) = favorites
            .iter()
            .position(|f| &f.user_id == favorite.user_id() && f.title == favorite.title().as_str())
        {
            let removed = favorites.remove(pos);
            return Ok(FavoriteToggleOutcome::Removed(removed.id));
        }
        let saved = favorite.clone().into_saved();
        favorites.push(saved.clone());
        Ok(FavoriteToggleOutcome::Added(saved))
    }

    async fn delete(&self, id: &FavoriteId, user_id: &UserId) -> Result<bool, InfraError> {
        if self.fail {
            return Err(injected_failure());
        }
        let mut favorites = self.favorites.lock().unwrap();
        let before = favorites.len();
        favorites.retain(|f| !(&f.id == id && &f.user_id == user_id));
        Ok(favorites.len() < before)
    }
}

// ===== MockUserRepository =====

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_or_create_by_email(
        &self,
        email: &Email,
        now: DateTime<Utc>,
    ) -> Result<User, InfraError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter().find(|u| u.email() == email) {
            return Ok(user.clone());
        }
        let user = User::new(UserId::new(), email.clone(), now);
        users.push(user.clone());
        Ok(user)
    }
}

// ===== MockSessionManager =====

#[derive(Clone, Default)]
pub struct MockSessionManager {
    sessions: Arc<Mutex<HashMap<String, SessionData>>>,
}

impl MockSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既知の ID でセッションを登録する
    pub fn insert(&self, session_id: &str, data: SessionData) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.to_string(), data);
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.lock().unwrap().contains_key(session_id)
    }
}

#[async_trait]
impl SessionManager for MockSessionManager {
    async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.insert(&session_id, data.clone());
        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }

    async fn get_ttl(&self, session_id: &str) -> Result<Option<i64>, InfraError> {
        let ttl = crate::session::SESSION_TTL_SECONDS as i64;
        Ok(self.contains(session_id).then_some(ttl))
    }
}

// ===== MockMagicLinkStore =====

#[derive(Clone, Default)]
pub struct MockMagicLinkStore {
    tokens: Arc<Mutex<HashMap<String, Email>>>,
}

impl MockMagicLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 発行済みで未消費のトークン
    pub fn pending_tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl MagicLinkStore for MockMagicLinkStore {
    async fn issue(&self, email: &Email) -> Result<String, InfraError> {
        let token = generate_token();
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), email.clone());
        Ok(token)
    }

    async fn consume(&self, token: &str) -> Result<Option<Email>, InfraError> {
        Ok(self.tokens.lock().unwrap().remove(token))
    }
}

// ===== MockNotificationSender =====

/// 送信したメールを記録する
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    fail: bool,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::SendFailed("モックで注入した失敗".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
