//! レシピ生成ユースケース

use std::sync::Arc;

use recipebox_domain::{
    clock::Clock,
    recipe::{GeneratedRecipe, RecipePrompt, content::normalize_webhook_response},
};
use recipebox_infra::repository::GeneratedRecipeRepository;

use crate::{client::RecipeWebhookClient, error::AppError};

/// レシピ生成ユースケース
pub struct RecipeGenerationUseCaseImpl {
    webhook:    Arc<dyn RecipeWebhookClient>,
    repository: Arc<dyn GeneratedRecipeRepository>,
    clock:      Arc<dyn Clock>,
}

impl RecipeGenerationUseCaseImpl {
    pub fn new(
        webhook: Arc<dyn RecipeWebhookClient>,
        repository: Arc<dyn GeneratedRecipeRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            webhook,
            repository,
            clock,
        }
    }

    /// 入力されたレシピ名から HTML を生成して保存する
    ///
    /// 1. 入力が空（空白のみ）なら Webhook を呼ばずに `Validation`
    /// 2. Webhook の応答を正規化（srcdoc 抽出、Markdown なら HTML 化）
    /// 3. 入力文字列をタイトルとして保存
    ///
    /// 途中で失敗したら何も保存しない。
    pub async fn generate(&self, message: Option<&str>) -> Result<GeneratedRecipe, AppError> {
        let prompt = RecipePrompt::new(message)?;

        let raw = self.webhook.generate(prompt.as_str()).await?;
        let html = normalize_webhook_response(&raw);

        let recipe = GeneratedRecipe::new(prompt, html, self.clock.now());
        self.repository.insert(&recipe).await?;

        tracing::info!(recipe.id = %recipe.id(), "レシピを生成しました");
        Ok(recipe)
    }
}
