use super::Settings;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use pastebox_core::config::{Config, WarnLevel};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a default config file if none exists
    Init,

    /// Show the effective config (dev key masked)
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(settings: &Settings, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Init => init(settings),
        ConfigSubcommand::Show => show(settings),
        ConfigSubcommand::Validate => validate(settings),
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(settings: &Settings) -> anyhow::Result<()> {
    let path = &settings.config_path;
    let written =
        Config::init(path).with_context(|| format!("failed to write {}", path.display()))?;

    if settings.json {
        print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "created": written,
        }))?;
    } else if written {
        println!("Wrote {}", path.display());
    } else {
        println!("{} already exists; left unchanged", path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(settings: &Settings) -> anyhow::Result<()> {
    let config = settings.load_config()?.redacted();

    if settings.json {
        print_json(&config)?;
    } else {
        println!("config:        {}", settings.config_path.display());
        println!("api_url:       {}", config.store.api_url);
        println!("raw_url:       {}", config.store.raw_url);
        println!("dev_key:       {}", display_or_unset(&config.store.dev_key));
        println!(
            "command_slot:  {}",
            config.poller.command_slot.as_deref().unwrap_or("(unset)")
        );
        println!("interval:      {}s", config.poller.interval_secs);
        println!(
            "result paste:  '{}' expires {}",
            config.poller.result_name, config.poller.result_expiry
        );
        println!(
            "command paste: '{}' expires {}",
            config.publisher.name, config.publisher.expiry
        );
    }
    Ok(())
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(settings: &Settings) -> anyhow::Result<()> {
    let config = settings.load_config()?;
    let warnings = config.validate();

    if settings.json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
