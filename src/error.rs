use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("AWS error: {0}")]
    AwsError(String),
    #[error("AWS service error: {0}")]
    AwsServiceError(String),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// Non-success status while downloading an image; carries the status text.
    #[error("Failed to fetch image: {0}")]
    FetchError(String),
    #[error("Decode error: {0}")]
    DecodeError(#[from] base64::DecodeError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImageGenError>;
