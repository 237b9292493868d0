use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub num_images: u32,
}

/// Outcome of an image call. Each `data` entry is either a remote URL or base64 image bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageGenerationResult {
    pub success: bool,
    pub data: Vec<String>,
    pub error: Option<String>,
}

impl ImageGenerationResult {
    pub fn success(data: Vec<String>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImagesApiRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub width: u32,
    pub height: u32,
    pub n: u32,
    pub response_format: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ImagesApiItem {
    pub url: Option<String>,
    pub b64_json: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImagesApiResponse {
    #[serde(default)]
    pub data: Vec<ImagesApiItem>,
}
