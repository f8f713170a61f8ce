//! 構造化レシピ投入ユースケース

use std::sync::Arc;

use recipebox_domain::{
    clock::Clock,
    recipe::structured::{NewStructuredRecipe, StructuredRecipe, StructuredRecipeDraft},
};
use recipebox_infra::repository::StructuredRecipeRepository;

use crate::error::AppError;

/// 構造化レシピ投入ユースケース
pub struct RecipeIngestionUseCaseImpl {
    repository: Arc<dyn StructuredRecipeRepository>,
    clock:      Arc<dyn Clock>,
}

impl RecipeIngestionUseCaseImpl {
    pub fn new(repository: Arc<dyn StructuredRecipeRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 構造化レシピを保存する
    ///
    /// 値の範囲は検証しない（負の調理時間もそのまま保存する）。
    pub async fn ingest(&self, draft: StructuredRecipeDraft) -> Result<StructuredRecipe, AppError> {
        let recipe = NewStructuredRecipe::new(draft, self.clock.now());
        let saved = self.repository.insert(&recipe).await?;

        tracing::info!(recipe.id = %saved.id, "構造化レシピを保存しました");
        Ok(saved)
    }

    /// 全件を新しい順で返す
    pub async fn list(&self) -> Result<Vec<StructuredRecipe>, AppError> {
        Ok(self.repository.find_all().await?)
    }
}
