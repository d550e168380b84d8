//! Color advisor abstraction used by the HTTP layer.

use async_trait::async_trait;
use colorpair_models::GarmentType;

use crate::client::GeminiClient;
use crate::error::GeminiResult;
use crate::prompt::build_color_prompt;
use crate::types::InlineImage;

/// Something that looks at a garment image and answers with raw text
/// that should contain a JSON array of color suggestions.
#[async_trait]
pub trait ColorAdvisor: Send + Sync {
    /// Model identifier reported by readiness checks.
    fn model_name(&self) -> &str;

    /// Ask for pairing colors for the garment in `image`.
    async fn suggest_colors(
        &self,
        image: &InlineImage,
        garment: &GarmentType,
    ) -> GeminiResult<String>;
}

#[async_trait]
impl ColorAdvisor for GeminiClient {
    fn model_name(&self) -> &str {
        self.model()
    }

    async fn suggest_colors(
        &self,
        image: &InlineImage,
        garment: &GarmentType,
    ) -> GeminiResult<String> {
        let prompt = build_color_prompt(garment);
        self.generate(&prompt, image).await
    }
}
