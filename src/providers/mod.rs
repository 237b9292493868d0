pub mod image_client;
pub mod text_client;
pub mod traits;

pub use image_client::HttpImageClient;
pub use text_client::BedrockTextClient;
pub use traits::{ImageGenerator, TextGenerator};
