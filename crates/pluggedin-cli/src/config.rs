//! Configuration handling

use anyhow::{Context, Result};
use pluggedin_sdk::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration file
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// API endpoint and credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Clipboard behaviour
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Plugged.in API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key; `PLUGGEDIN_API_KEY` takes precedence
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

fn default_base_url() -> String {
    pluggedin_sdk::DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds (0 disables)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// Server supports `DELETE {clearAll: true}`
    #[serde(default = "default_true")]
    pub bulk_clear: bool,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self { bulk_clear: true }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from a file path
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path).to_string();
        let path = Path::new(&expanded);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Default location: `<config dir>/pluggedin/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("pluggedin").join("config.toml"))
    }

    /// SDK settings, with `env_api_key` overriding the file's key.
    pub fn client_config(&self, env_api_key: Option<String>) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            api_key: env_api_key
                .filter(|k| !k.is_empty())
                .or_else(|| self.api.api_key.clone()),
            timeout: (self.http.timeout_seconds > 0)
                .then(|| Duration::from_secs(self.http.timeout_seconds)),
            bulk_clear: self.clipboard.bulk_clear,
        }
    }
}

/// Show current configuration
pub fn show(config_path: &str) -> Result<()> {
    let config = Config::load(config_path)?;
    let effective = config.client_config(std::env::var("PLUGGEDIN_API_KEY").ok());

    println!("Plugged.in Configuration");
    println!("========================");
    println!();
    println!("Config file: {}", config_path);
    println!();

    println!("[api]");
    println!("  base_url = \"{}\"", effective.base_url);
    println!(
        "  api_key = {}",
        if effective.api_key.is_some() {
            "<set>"
        } else {
            "<unset>"
        }
    );
    println!();

    println!("[http]");
    println!("  timeout_seconds = {}", config.http.timeout_seconds);
    println!();

    println!("[clipboard]");
    println!("  bulk_clear = {}", config.clipboard.bulk_clear);

    Ok(())
}
