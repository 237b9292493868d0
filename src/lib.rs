//! Image generation action for chat agents.
//!
//! A language model turns the user's message into a short visual prompt, an
//! image model renders it, and the result is either forwarded as a URL or
//! saved under `images/lora/`. Progress and the final attachment are reported
//! through the host's callback.

pub mod action;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod persist;
pub mod providers;
pub mod runtime;

pub use action::{Action, GenerateImageAction, PromptGenerator};
pub use config::{ActionConfig, BedrockConfig, Config, ImageApiConfig};
pub use error::{ImageGenError, Result};
pub use models::*;
pub use persist::{save_base64_image, save_image_from_url, ImageStore};
pub use providers::{BedrockTextClient, HttpImageClient, ImageGenerator, TextGenerator};
pub use runtime::{EnvSettings, HandlerCallback, MapSettings, RuntimeSettings};

pub const PLUGIN_NAME: &str = "lora-imagegen";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");
