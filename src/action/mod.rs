pub mod generate_image;
pub mod prompt;

use crate::{
    models::{ActionExample, Memory},
    runtime::{HandlerCallback, RuntimeSettings},
};
use async_trait::async_trait;

pub use generate_image::GenerateImageAction;
pub use prompt::PromptGenerator;

/// A named unit of agent behaviour the host runtime can offer and invoke.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &str;
    fn similes(&self) -> &[&'static str];
    fn description(&self) -> &str;
    fn examples(&self) -> Vec<Vec<ActionExample>>;

    /// Whether the action should be offered for this message at all.
    async fn validate(&self, runtime: &dyn RuntimeSettings, message: &Memory) -> bool;

    /// Runs the action, reporting progress through `callback`. Returns overall success.
    async fn handler(
        &self,
        runtime: &dyn RuntimeSettings,
        message: &Memory,
        callback: &dyn HandlerCallback,
    ) -> bool;
}
