use crate::{
    action::{Action, PromptGenerator},
    config::ActionConfig,
    error::{ImageGenError, Result},
    logger,
    models::{ActionExample, Attachment, Content, ImageGenerationRequest, Memory, PNG_CONTENT_TYPE},
    persist::ImageStore,
    providers::{ImageGenerator, TextGenerator},
    runtime::{HandlerCallback, RuntimeSettings},
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub const ACTION_NAME: &str = "GENERATE_IMAGE";
pub const IMAGE_MODEL: &str = "FLUX.1-dev";
pub const IMAGE_SIZE: u32 = 1024;

pub const STARTING_TEXT: &str = "I'll create an image for that. Working out a prompt first...";
pub const COMPLETED_TEXT: &str = "Here's the image I generated.";
pub const FAILURE_TEXT: &str = "Image generation failed. Please try again later.";

const SIMILES: &[&str] = &[
    "IMAGE_GENERATION",
    "GENERATE_PICTURE",
    "CREATE_IMAGE",
    "MAKE_IMAGE",
    "DRAW",
    "PAINT",
    "ILLUSTRATE",
];

/// Writes an image prompt with the language model, renders it and reports back with one attachment.
pub struct GenerateImageAction {
    prompts: PromptGenerator,
    images: Arc<dyn ImageGenerator>,
    store: ImageStore,
    config: ActionConfig,
}

impl GenerateImageAction {
    pub fn new(
        text: Arc<dyn TextGenerator>,
        images: Arc<dyn ImageGenerator>,
        config: ActionConfig,
    ) -> Self {
        Self {
            prompts: PromptGenerator::new(text),
            images,
            store: ImageStore::new(config.output_dir.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    async fn notify(&self, callback: &dyn HandlerCallback, content: Content) {
        if let Err(e) = callback.call(content).await {
            log::warn!("⚠️  Callback delivery failed: {}", e);
        }
    }

    async fn run(&self, message: &Memory, callback: &dyn HandlerCallback) -> Result<Content> {
        self.notify(callback, Content::text(STARTING_TEXT)).await;

        let prompt = self.prompts.generate(&message.content.text).await?;
        log::info!("🎨 Image prompt: {}", prompt);

        self.notify(
            callback,
            Content::text(format!("Generating an image for: \"{}\"", prompt)),
        )
        .await;

        let result = self
            .images
            .generate(ImageGenerationRequest {
                prompt: prompt.clone(),
                model_id: IMAGE_MODEL.to_string(),
                width: IMAGE_SIZE,
                height: IMAGE_SIZE,
                num_images: 1,
            })
            .await?;

        if !result.success {
            return Err(ImageGenError::ResponseError(
                result
                    .error
                    .unwrap_or_else(|| "image service reported failure".to_string()),
            ));
        }

        let image = result
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ImageGenError::ResponseError("No images generated".into()))?;

        let url = self.resolve_image(image).await?;

        let attachment = Attachment {
            id: Uuid::new_v4().to_string(),
            url,
            title: "Generated image".to_string(),
            source: "imageGeneration".to_string(),
            description: prompt.clone(),
            text: prompt,
            content_type: PNG_CONTENT_TYPE.to_string(),
        };

        Ok(Content::text(COMPLETED_TEXT)
            .with_action(ACTION_NAME)
            .with_attachment(attachment))
    }

    /// Remote URLs are forwarded; anything else is treated as base64 and saved locally.
    async fn resolve_image(&self, image: String) -> Result<String> {
        let filename = new_filename();

        if is_remote_url(&image) {
            if self.config.persist_remote_images {
                if let Err(e) = self.store.save_image_from_url(&image, &filename).await {
                    log::warn!("⚠️  Could not keep a local copy of {}: {}", image, e);
                }
            }
            return Ok(image);
        }

        let path = self.store.save_base64_image(&image, &filename).await?;
        Ok(path.to_string_lossy().into_owned())
    }
}

fn is_remote_url(image: &str) -> bool {
    ["https://", "http://"].iter().any(|scheme| {
        image
            .get(..scheme.len())
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

fn new_filename() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("generated_{}_{}", Utc::now().timestamp_millis(), &id[..8])
}

#[async_trait]
impl Action for GenerateImageAction {
    fn name(&self) -> &str {
        ACTION_NAME
    }

    fn similes(&self) -> &[&'static str] {
        SIMILES
    }

    fn description(&self) -> &str {
        "Generate an image from the conversation: a language model writes the prompt and an image model renders it."
    }

    fn examples(&self) -> Vec<Vec<ActionExample>> {
        let exchange = |request: &str| {
            vec![
                ActionExample::new("{{user1}}", Content::text(request)),
                ActionExample::new(
                    "{{agentName}}",
                    Content::text("Sure, generating that image now.").with_action(ACTION_NAME),
                ),
            ]
        };

        vec![
            exchange("Can you draw a cat sleeping on a windowsill?"),
            exchange("Make me a picture of a futuristic city at night"),
            exchange("Paint a watercolor of mountains at sunrise"),
        ]
    }

    async fn validate(&self, runtime: &dyn RuntimeSettings, _message: &Memory) -> bool {
        let present = runtime
            .get_setting(&self.config.credential_key)
            .map_or(false, |value| !value.trim().is_empty());

        if present {
            log::debug!("{} is available: {} is set", ACTION_NAME, self.config.credential_key);
        } else {
            log::debug!(
                "{} disabled: {} is not configured",
                ACTION_NAME,
                self.config.credential_key
            );
        }
        present
    }

    async fn handler(
        &self,
        runtime: &dyn RuntimeSettings,
        message: &Memory,
        callback: &dyn HandlerCallback,
    ) -> bool {
        let _timer = logger::timer(ACTION_NAME);

        if !self.validate(runtime, message).await {
            log::error!("❌ {} invoked without {}", ACTION_NAME, self.config.credential_key);
            self.notify(callback, Content::text(FAILURE_TEXT)).await;
            return false;
        }

        match self.run(message, callback).await {
            Ok(content) => {
                log::info!("✅ Image generated for message {}", message.id);
                self.notify(callback, content).await;
                true
            }
            Err(e) => {
                log::error!("❌ Image generation failed for message {}: {}", message.id, e);
                self.notify(callback, Content::text(FAILURE_TEXT)).await;
                false
            }
        }
    }
}
