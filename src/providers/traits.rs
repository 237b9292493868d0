use crate::{
    error::Result,
    models::{ImageGenerationRequest, ImageGenerationResult, TextGenerationRequest},
};
use async_trait::async_trait;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, request: TextGenerationRequest) -> Result<String>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResult>;
}
