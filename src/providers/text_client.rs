use crate::{
    config::{BedrockConfig, DEFAULT_REGION},
    error::{ImageGenError, Result},
    models::{AnthropicResponse, LlamaResponse, TextGenerationRequest, TitanTextResponse},
    providers::TextGenerator,
};
use async_trait::async_trait;
use aws_config::{meta::region::RegionProviderChain, SdkConfig};
use aws_sdk_bedrockruntime::{
    config::{Credentials, Region},
    error::ProvideErrorMetadata,
    primitives::Blob,
    Client,
};
use serde_json::json;

const DEFAULT_MAX_TOKENS: i32 = 512;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Text completions through AWS Bedrock `invoke_model`.
#[derive(Clone)]
pub struct BedrockTextClient {
    client: Client,
    config: BedrockConfig,
}

impl BedrockTextClient {
    pub fn new(client: Client, config: BedrockConfig) -> Self {
        Self { client, config }
    }

    /// Loads AWS configuration from `config`, falling back to the default provider chains.
    pub async fn from_config(config: BedrockConfig) -> Result<Self> {
        let sdk_config = load_sdk_config(&config).await;
        Ok(Self::new(Client::new(&sdk_config), config))
    }

    pub fn config(&self) -> &BedrockConfig {
        &self.config
    }
}

#[async_trait]
impl TextGenerator for BedrockTextClient {
    async fn generate_text(&self, request: TextGenerationRequest) -> Result<String> {
        let model_id = self.config.model_for(request.model_class).to_string();
        let payload = build_request_payload(&request, &model_id)?;
        let request_json = serde_json::to_string(&payload)
            .map_err(|e| ImageGenError::SerializationError(e.to_string()))?;

        log::info!("Invoking model: {}", model_id);
        log::debug!("Text generation request payload: {}", request_json);

        let response = self
            .client
            .invoke_model()
            .model_id(&model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                log::error!("Bedrock text generation error details: {:?}", e);

                if let Some(service_error) = e.as_service_error() {
                    ImageGenError::AwsServiceError(format!(
                        "Bedrock service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    ImageGenError::AwsError(format!("AWS SDK error: {}", e))
                }
            })?;

        let response_str = String::from_utf8(response.body.into_inner())
            .map_err(|e| ImageGenError::ResponseError(e.to_string()))?;

        parse_response(&response_str, &model_id)
    }
}

/// Explicit region wins over the environment; `us-east-1` when nothing resolves.
pub(crate) async fn load_sdk_config(config: &BedrockConfig) -> SdkConfig {
    let region = RegionProviderChain::first_try(config.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(DEFAULT_REGION);

    let mut loader = aws_config::from_env().region(region);
    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        loader = loader.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "lora-imagegen",
        ));
    }

    loader.load().await
}

/// Joins the system instruction and the user context for families without a system field.
fn inline_prompt(request: &TextGenerationRequest) -> String {
    match &request.system_prompt {
        Some(system) => format!("{}\n\n{}", system, request.context),
        None => request.context.clone(),
    }
}

pub(crate) fn build_request_payload(
    request: &TextGenerationRequest,
    model_id: &str,
) -> Result<serde_json::Value> {
    let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
    let temperature = request.temperature.unwrap_or(DEFAULT_TEMPERATURE);

    let payload = match model_id {
        id if id.starts_with("amazon.titan") => json!({
            "inputText": inline_prompt(request),
            "textGenerationConfig": {
                "maxTokenCount": max_tokens,
                "temperature": temperature,
                "topP": 0.9
            }
        }),
        id if id.starts_with("anthropic.claude") || id.starts_with("arn:aws:bedrock") => {
            let mut payload = json!({
                "messages": [
                    {
                        "role": "user",
                        "content": request.context
                    }
                ],
                "max_tokens": max_tokens,
                "temperature": temperature,
                "anthropic_version": "bedrock-2023-05-31"
            });
            if let (Some(system), Some(obj)) = (&request.system_prompt, payload.as_object_mut()) {
                obj.insert("system".to_string(), json!(system));
            }
            payload
        }
        id if id.starts_with("meta.llama") => json!({
            "prompt": inline_prompt(request),
            "max_gen_len": max_tokens,
            "temperature": temperature,
            "top_p": 0.9
        }),
        id if id.starts_with("mistral.mistral") => json!({
            "prompt": format!("<s>[INST] {} [/INST]", inline_prompt(request)),
            "max_tokens": max_tokens,
            "temperature": temperature,
            "top_p": 0.9
        }),
        id if id.starts_with("ai21.") => json!({
            "prompt": inline_prompt(request),
            "maxTokens": max_tokens,
            "temperature": temperature,
            "topP": 0.9
        }),
        id if id.starts_with("cohere.command") => json!({
            "prompt": inline_prompt(request),
            "max_tokens": max_tokens,
            "temperature": temperature,
            "p": 0.9
        }),
        _ => {
            return Err(ImageGenError::RequestError(format!(
                "Unsupported model ID: {}",
                model_id
            )))
        }
    };

    Ok(payload)
}

pub(crate) fn parse_response(body: &str, model_id: &str) -> Result<String> {
    let text = match model_id {
        id if id.starts_with("amazon.titan") => {
            let response: TitanTextResponse = serde_json::from_str(body)
                .map_err(|e| ImageGenError::ResponseError(e.to_string()))?;
            response
                .results
                .into_iter()
                .next()
                .map(|result| result.output_text)
        }
        id if id.starts_with("anthropic.claude") || id.starts_with("arn:aws:bedrock") => {
            let response: AnthropicResponse = serde_json::from_str(body)
                .map_err(|e| ImageGenError::ResponseError(e.to_string()))?;
            let text: String = response
                .content
                .into_iter()
                .filter(|block| block.block_type == "text")
                .map(|block| block.text)
                .collect();
            Some(text)
        }
        id if id.starts_with("meta.llama") => {
            let response: LlamaResponse = serde_json::from_str(body)
                .map_err(|e| ImageGenError::ResponseError(e.to_string()))?;
            Some(response.generation)
        }
        _ => {
            let json: serde_json::Value = serde_json::from_str(body)
                .map_err(|e| ImageGenError::ResponseError(e.to_string()))?;
            let value = if model_id.starts_with("mistral.mistral") {
                &json["outputs"][0]["text"]
            } else if model_id.starts_with("ai21.") {
                &json["completions"][0]["data"]["text"]
            } else {
                &json["generations"][0]["text"]
            };
            value.as_str().map(String::from)
        }
    };

    text.ok_or_else(|| {
        ImageGenError::ResponseError(format!("No completion text returned by {}", model_id))
    })
}
