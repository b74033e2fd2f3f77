//! Configuration management for diskpush

use crate::api::DEFAULT_BASE_URL;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::transport::DEFAULT_TIMEOUT;
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration directory name
const CONFIG_DIR: &str = "diskpush";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Accepted values for `logging.format`
const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    pub logging: Option<LoggingConfig>,
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// OAuth access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

/// Upload defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default)]
    pub make_dirs: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Wait between attempts in milliseconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            overwrite: false,
            make_dirs: false,
            max_retries: default_max_retries(),
            retry_delay: default_retry_delay(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl UploadConfig {
    /// Retry policy described by this section
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_retries(self.max_retries)
            .with_delay(Duration::from_millis(self.retry_delay))
            .with_backoff_multiplier(self.backoff_multiplier)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default values
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    2000 // 2 seconds
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let home = home_dir().ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))?;
    let config_dir = home.join(".config").join(CONFIG_DIR);

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
    }

    Ok(config_dir)
}

/// Get the configuration file path
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Load configuration from the default location
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&get_config_path()?)
}

/// Load configuration from `path`
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Err(Error::ConfigNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        Error::InvalidConfig(format!("Failed to read config file: {}", e))
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| {
        Error::InvalidConfig(format!("Failed to parse config file: {}", e))
    })?;

    Ok(config)
}

/// Save configuration to the default location
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(config, &get_config_path()?)
}

/// Save configuration to `path`
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config).map_err(|e| {
        Error::InvalidConfig(format!("Failed to serialize config: {}", e))
    })?;

    fs::write(path, content).map_err(|e| {
        Error::Config(format!("Failed to write config file: {}", e))
    })?;

    // The file holds the access token: owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(token) = &config.auth.token {
        if token.trim().is_empty() {
            return Err(Error::InvalidInput("Access token cannot be empty".to_string()));
        }
    }

    let base_url = &config.api.base_url;
    if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
        return Err(Error::InvalidInput(format!(
            "API base URL must start with http:// or https:// (got '{}')",
            base_url
        )));
    }

    if config.api.timeout == 0 {
        return Err(Error::InvalidInput("Timeout must be greater than 0 seconds".to_string()));
    }

    if config.upload.max_retries == 0 {
        return Err(Error::InvalidInput("max_retries must be at least 1".to_string()));
    }

    let multiplier = config.upload.backoff_multiplier;
    if multiplier.is_nan() || multiplier < 1.0 {
        return Err(Error::InvalidInput(format!(
            "backoff_multiplier must be at least 1.0 (got {})",
            multiplier
        )));
    }

    if let Some(logging) = &config.logging {
        if !LOG_FORMATS.contains(&logging.format.as_str()) {
            return Err(Error::InvalidInput(format!(
                "Unknown log format '{}' (expected one of: {})",
                logging.format,
                LOG_FORMATS.join(", ")
            )));
        }
    }

    Ok(())
}

/// Check if configuration exists
pub fn config_exists() -> bool {
    get_config_path().map(|p| p.exists()).unwrap_or(false)
}

/// Public alias for ConfigFile (used by lib.rs)
pub use ConfigFile as Config;
