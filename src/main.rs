use async_trait::async_trait;
use clap::Parser;
use lora_imagegen::{
    logger::{self, LogLevel, LoggerConfig},
    Action, BedrockTextClient, Config, Content, EnvSettings, GenerateImageAction,
    HandlerCallback, HttpImageClient, ImageGenError, Memory,
};
use std::process::ExitCode;
use std::sync::Arc;

/// Generate an image for a chat message and print each progress payload as JSON.
#[derive(Debug, Parser)]
#[command(name = "lora-imagegen", version, about)]
struct Cli {
    /// Message to turn into an image; multiple words are joined with spaces.
    #[arg(required = true)]
    message: Vec<String>,

    /// Minimum log level: trace, debug, info, warn or error.
    #[arg(long, env = "LOG_LEVEL", default_value = "info", value_parser = parse_level)]
    log_level: LogLevel,
}

impl Cli {
    fn message_text(&self) -> String {
        self.message.join(" ")
    }
}

fn parse_level(name: &str) -> Result<LogLevel, String> {
    LogLevel::parse(name).ok_or_else(|| format!("unknown log level '{}'", name))
}

/// Prints every callback payload to stdout as one JSON line.
struct StdoutCallback;

#[async_trait]
impl HandlerCallback for StdoutCallback {
    async fn call(&self, content: Content) -> lora_imagegen::Result<()> {
        let line = serde_json::to_string(&content)
            .map_err(|e| ImageGenError::SerializationError(e.to_string()))?;
        println!("{}", line);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Loaded before parsing so `.env` can supply `LOG_LEVEL`.
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_config(LoggerConfig::new().with_level(cli.log_level)) {
        eprintln!("{}", e);
    }

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    match run(config, Memory::new(cli.message_text())).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, message: Memory) -> lora_imagegen::Result<bool> {
    let runtime = EnvSettings;

    let images = HttpImageClient::new(config.image_api.clone());
    let text = BedrockTextClient::from_config(config.bedrock.clone()).await?;
    log::info!("✅ Bedrock client initialized");

    let action = GenerateImageAction::new(Arc::new(text), Arc::new(images), config.action);

    if !action.validate(&runtime, &message).await {
        log::error!(
            "❌ {} is not available: set {}",
            action.name(),
            action.config().credential_key
        );
        return Ok(false);
    }

    Ok(action.handler(&runtime, &message, &StdoutCallback).await)
}
