use crate::models::ModelClass;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_SMALL_MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";
pub const DEFAULT_MEDIUM_MODEL: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";
pub const DEFAULT_LARGE_MODEL: &str = "anthropic.claude-3-opus-20240229-v1:0";

pub const DEFAULT_IMAGE_API_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_CREDENTIAL_KEY: &str = "IMAGE_API_KEY";
pub const DEFAULT_OUTPUT_DIR: &str = "images/lora";

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub small_model: Option<String>,
    pub medium_model: Option<String>,
    pub large_model: Option<String>,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            small_model: None,
            medium_model: None,
            large_model: None,
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok();
        let access_key = env::var("AWS_ACCESS_KEY_ID").ok();
        let secret_key = env::var("AWS_SECRET_ACCESS_KEY").ok();
        let small_model = env::var("BEDROCK_SMALL_MODEL").ok();
        let medium_model = env::var("BEDROCK_MEDIUM_MODEL").ok();
        let large_model = env::var("BEDROCK_LARGE_MODEL").ok();

        BedrockConfig {
            region,
            access_key,
            secret_key,
            small_model,
            medium_model,
            large_model,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_model(mut self, class: ModelClass, model_id: impl Into<String>) -> Self {
        let model_id = Some(model_id.into());
        match class {
            ModelClass::Small => self.small_model = model_id,
            ModelClass::Medium => self.medium_model = model_id,
            ModelClass::Large => self.large_model = model_id,
        }
        self
    }

    /// Bedrock model id used for a model class, falling back to the built-in defaults.
    pub fn model_for(&self, class: ModelClass) -> &str {
        match class {
            ModelClass::Small => self.small_model.as_deref().unwrap_or(DEFAULT_SMALL_MODEL),
            ModelClass::Medium => self
                .medium_model
                .as_deref()
                .unwrap_or(DEFAULT_MEDIUM_MODEL),
            ModelClass::Large => self.large_model.as_deref().unwrap_or(DEFAULT_LARGE_MODEL),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageApiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Default for ImageApiConfig {
    fn default() -> Self {
        ImageApiConfig {
            api_key: None,
            base_url: None,
        }
    }
}

impl ImageApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var(DEFAULT_CREDENTIAL_KEY).ok();
        let base_url = env::var("IMAGE_API_URL").ok();

        ImageApiConfig { api_key, base_url }
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_API_URL)
            .trim_end_matches('/')
    }
}

#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// Setting that must be present for the action to be offered.
    pub credential_key: String,
    pub output_dir: PathBuf,
    pub persist_remote_images: bool,
}

impl Default for ActionConfig {
    fn default() -> Self {
        ActionConfig {
            credential_key: DEFAULT_CREDENTIAL_KEY.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            persist_remote_images: false,
        }
    }
}

impl ActionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let output_dir = env::var("IMAGE_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let persist_remote_images = env::var("PERSIST_REMOTE_IMAGES")
            .ok()
            .map_or(false, |val| val == "true");

        ActionConfig {
            credential_key: DEFAULT_CREDENTIAL_KEY.to_string(),
            output_dir,
            persist_remote_images,
        }
    }

    pub fn with_credential_key(mut self, key: impl Into<String>) -> Self {
        self.credential_key = key.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_persist_remote_images(mut self, enabled: bool) -> Self {
        self.persist_remote_images = enabled;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bedrock: BedrockConfig,
    pub image_api: ImageApiConfig,
    pub action: ActionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bedrock: BedrockConfig::default(),
            image_api: ImageApiConfig::default(),
            action: ActionConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            bedrock: BedrockConfig::from_env(),
            image_api: ImageApiConfig::from_env(),
            action: ActionConfig::from_env(),
        }
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }

    pub fn with_image_api(mut self, config: ImageApiConfig) -> Self {
        self.image_api = config;
        self
    }

    pub fn with_action(mut self, config: ActionConfig) -> Self {
        self.action = config;
        self
    }
}
