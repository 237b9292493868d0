use crate::{
    config::ImageApiConfig,
    error::{ImageGenError, Result},
    models::{ImageGenerationRequest, ImageGenerationResult, ImagesApiRequest, ImagesApiResponse},
    providers::ImageGenerator,
};
use async_trait::async_trait;
use reqwest::Client;

/// Image generation against an OpenAI-compatible `/images/generations` endpoint.
#[derive(Clone)]
pub struct HttpImageClient {
    client: Client,
    config: ImageApiConfig,
    response_format: String,
}

impl HttpImageClient {
    pub fn new(config: ImageApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            response_format: "url".to_string(),
        }
    }

    /// Ask the API for inline base64 payloads (`b64_json`) instead of hosted URLs.
    pub fn with_base64_response(mut self) -> Self {
        self.response_format = "b64_json".to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/images/generations", self.config.base_url())
    }
}

#[async_trait]
impl ImageGenerator for HttpImageClient {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResult> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            ImageGenError::ConfigError("Image API key is not configured".into())
        })?;

        let body = ImagesApiRequest {
            model: &request.model_id,
            prompt: &request.prompt,
            width: request.width,
            height: request.height,
            n: request.num_images,
            response_format: &self.response_format,
        };

        log::info!(
            "Generating image with model: {} ({}x{})",
            request.model_id,
            request.width,
            request.height
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    log::warn!("⚠️  Could not read image API error body: {}", e);
                    String::new()
                }
            };
            log::error!("Image API returned {}: {}", status, error_body);
            return Ok(ImageGenerationResult::failure(format!(
                "{}: {}",
                status, error_body
            )));
        }

        let api_response: ImagesApiResponse = response
            .json()
            .await
            .map_err(|e| ImageGenError::ResponseError(e.to_string()))?;

        let data: Vec<String> = api_response
            .data
            .into_iter()
            .filter_map(|item| item.url.or(item.b64_json))
            .collect();

        log::debug!("Image API returned {} item(s)", data.len());
        Ok(ImageGenerationResult::success(data))
    }
}
