//! Runtime settings for the ingestion tool
//!
//! Supports loading settings from:
//! - Default values
//! - Settings file (provision.toml)
//! - Environment variables (PROVISION__*)
//!
//! ## Example settings file (provision.toml):
//! ```toml
//! [fetch]
//! oem_dir = "/usr/lib/provision/oem"
//! timeout_secs = 10
//! enabled_schemes = ["data", "oem"]
//!
//! [ingest]
//! output_format = "pretty"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main settings for the ingestion tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Fetch settings
    #[serde(default)]
    pub fetch: FetchSettings,

    /// Output settings
    #[serde(default)]
    pub ingest: IngestSettings,
}

/// Settings for the fetch pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Base directory that `oem:` URLs resolve under
    #[serde(default = "default_oem_dir")]
    pub oem_dir: PathBuf,

    /// Transport timeout handed to network strategies
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Schemes whose built-in strategy is enabled
    #[serde(default = "default_schemes")]
    pub enabled_schemes: Vec<String>,
}

/// Settings for how an ingested config is emitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestSettings {
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

fn default_oem_dir() -> PathBuf {
    PathBuf::from("/usr/lib/provision/oem")
}

fn default_schemes() -> Vec<String> {
    vec!["data".to_string(), "oem".to_string()]
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            oem_dir: default_oem_dir(),
            timeout_secs: None,
            enabled_schemes: default_schemes(),
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Settings {
    /// Load settings from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load settings, layering an explicit file over the default locations
    pub fn load_from(settings_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let locations = ["provision.toml", ".provision.toml", "config/provision.toml"];
        for location in locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(dirs) = directories::ProjectDirs::from("dev", "provision", "provision") {
            let xdg_settings = dirs.config_dir().join("provision.toml");
            if xdg_settings.exists() {
                builder = builder.add_source(File::from(xdg_settings).required(false));
            }
        }

        if let Some(path) = settings_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // PROVISION__FETCH__OEM_DIR etc.
        builder = builder.add_source(
            Environment::with_prefix("PROVISION")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("fetch.enabled_schemes"),
        );

        builder.build()?.try_deserialize()
    }

    /// Save settings to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
