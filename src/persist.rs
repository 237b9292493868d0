//! Writing generated images to disk.
//!
//! Files land in `<dir>/<filename>.png`. The directory is created on demand
//! and an existing file with the same name is overwritten.

use crate::{
    config::DEFAULT_OUTPUT_DIR,
    error::{ImageGenError, Result},
};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Standard alphabet, padding optional on decode.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

static DATA_URI_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/[\w.+-]+;base64,").expect("valid regex"));

/// Removes a leading `data:image/...;base64,` header if present.
pub fn strip_data_uri(data: &str) -> &str {
    match DATA_URI_PREFIX.find(data) {
        Some(m) => &data[m.end()..],
        None => data,
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    client: Client,
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            client: Client::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(format!("{}.png", filename))
    }

    pub async fn save_base64_image(&self, data: &str, filename: &str) -> Result<PathBuf> {
        // Line-wrapped (MIME) payloads are common; whitespace is not part of the data.
        let encoded: String = strip_data_uri(data)
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = LENIENT_BASE64.decode(encoded)?;
        self.write(filename, &bytes).await
    }

    pub async fn save_image_from_url(&self, url: &str, filename: &str) -> Result<PathBuf> {
        log::debug!("Downloading image from {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .map(String::from)
                .unwrap_or_else(|| status.as_str().to_string());
            return Err(ImageGenError::FetchError(status_text));
        }

        let bytes = response.bytes().await?;
        self.write(filename, &bytes).await
    }

    async fn write(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(filename);
        fs::write(&path, bytes).await?;
        log::info!("💾 Image saved to: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Decodes `data` and saves it under the default image directory.
pub async fn save_base64_image(data: &str, filename: &str) -> Result<PathBuf> {
    ImageStore::default().save_base64_image(data, filename).await
}

/// Downloads `url` into the default image directory.
pub async fn save_image_from_url(url: &str, filename: &str) -> Result<PathBuf> {
    ImageStore::default().save_image_from_url(url, filename).await
}
