use formsync_editor::{DeriveOptions, SessionOptions};
use formsync_navigation::UNTITLED;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "formsync.config.json";

/// formsync configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Seed for generated dictionary ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_prefix: Option<String>,

    /// Navigation text for nodes with neither a title nor a key
    #[serde(default = "default_untitled")]
    pub untitled: String,

    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_untitled() -> String {
    UNTITLED.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            derive: DeriveOptions {
                untitled: self.untitled.clone(),
            },
            id_prefix: self.id_prefix.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_prefix: None,
            untitled: default_untitled(),
            log_level: default_log_level(),
        }
    }
}
