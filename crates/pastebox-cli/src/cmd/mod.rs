pub mod config;
pub mod demo;
pub mod poll;
pub mod publish;

use anyhow::Context;
use pastebox_core::config::Config;
use std::path::PathBuf;

/// Global options shared by every subcommand.
pub struct Settings {
    pub config_path: PathBuf,
    pub dev_key: Option<String>,
    pub json: bool,
}

impl Settings {
    /// Load the config file (or defaults) and apply command-line overrides.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load_or_default(&self.config_path).with_context(|| {
            format!("failed to load config from {}", self.config_path.display())
        })?;
        if let Some(key) = &self.dev_key {
            config.store.dev_key = key.clone();
        }
        Ok(config)
    }
}
