use crate::{error::Result, models::Content};
use async_trait::async_trait;
use std::collections::HashMap;
use std::env;

/// Key/value settings lookup provided by the host agent runtime.
pub trait RuntimeSettings: Send + Sync {
    fn get_setting(&self, key: &str) -> Option<String>;
}

/// Reads settings from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings;

impl RuntimeSettings for EnvSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapSettings {
    values: HashMap<String, String>,
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl RuntimeSettings for MapSettings {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Progress reporting channel back to the host; each call delivers one message.
#[async_trait]
pub trait HandlerCallback: Send + Sync {
    async fn call(&self, content: Content) -> Result<()>;
}
