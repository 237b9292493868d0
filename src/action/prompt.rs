use crate::{
    error::Result,
    models::{ModelClass, TextGenerationRequest},
    providers::TextGenerator,
};
use std::sync::Arc;

pub const IMAGE_PROMPT_SYSTEM: &str = "You are an expert at writing prompts for image generation models. \
Rewrite the user's request as a single image prompt of at most 25 words. \
Describe only what should be seen: subject, setting, composition, lighting, colors and style. \
Do not tell a story, explain, or add any preamble. Respond with the prompt text only.";

/// Turns a chat message into a short, visual image prompt with one completion call.
#[derive(Clone)]
pub struct PromptGenerator {
    text: Arc<dyn TextGenerator>,
}

impl PromptGenerator {
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self { text }
    }

    pub async fn generate(&self, message_text: &str) -> Result<String> {
        let request = TextGenerationRequest::new(message_text, ModelClass::Small)
            .with_system_prompt(IMAGE_PROMPT_SYSTEM)
            .with_max_tokens(100);

        let raw = self.text.generate_text(request).await?;
        Ok(clean_prompt(&raw))
    }
}

fn clean_prompt(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}
