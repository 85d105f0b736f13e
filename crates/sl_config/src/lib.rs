//! `sl_config` - Configuration parsing and validation for snowlens
//!
//! This crate provides:
//! - TOML configuration parsing
//! - Default value handling
//! - Environment variable overrides
//! - Path expansion (`~/` to home directory)
//! - Auto-discovery from standard config paths

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to render TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SlConfig {
    /// Global settings
    pub global: GlobalConfig,

    /// HTTP API settings
    pub web: WebConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Enable JSON logging
    pub json_logs: bool,

    /// JSON fixture file to seed the store from instead of the built-in data
    pub fixtures_path: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            fixtures_path: None,
        }
    }
}

impl GlobalConfig {
    pub fn expand_paths(&mut self) {
        if let Some(ref mut path) = self.fixtures_path {
            *path = expand_path(path);
        }
    }
}

/// Expand tilde in path to home directory
#[must_use]
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if let Some(stripped) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    } else if path_str == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    path.to_path_buf()
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address
    pub bind_address: String,

    /// Port
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,

    /// Directory holding a pre-built dashboard bundle
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            cors_enabled: false,
            cors_origins: vec![],
            static_dir: None,
        }
    }
}

impl WebConfig {
    pub fn expand_paths(&mut self) {
        if let Some(ref mut path) = self.static_dir {
            *path = expand_path(path);
        }
    }
}

impl SlConfig {
    /// Standard config file paths, in order of precedence
    #[must_use]
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // 1. Current directory (project-local)
            PathBuf::from("snowlens.toml"),
        ];

        // 2. User config directory (~/.config/snowlens/snowlens.toml)
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("snowlens").join("snowlens.toml"));
        }

        // 3. System config
        paths.push(PathBuf::from("/etc/snowlens/snowlens.toml"));

        paths
    }

    /// Discover and load configuration from standard paths.
    ///
    /// Returns defaults if no config file is found.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if a discovered config file cannot be loaded.
    pub fn discover() -> Result<Self, ConfigError> {
        for path in Self::config_paths() {
            if path.exists() {
                info!(path = %path.display(), "Loading config from");
                return Self::load(&path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Discover config and apply environment variable overrides.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if config discovery or validation fails.
    pub fn discover_with_env() -> Result<Self, ConfigError> {
        let mut config = Self::discover()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the text cannot be parsed or validated.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: SlConfig = toml::from_str(content)?;
        config.global.expand_paths();
        config.web.expand_paths();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or validated.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("SL_LOG_LEVEL") {
            self.global.log_level = val;
        }
        if let Some(val) = lookup("SL_FIXTURES_PATH") {
            self.global.fixtures_path = Some(expand_path(&PathBuf::from(val)));
        }
        if let Some(val) = lookup("SL_WEB_PORT")
            && let Ok(port) = val.parse()
        {
            self.web.port = port;
        }
        if let Some(val) = lookup("SL_WEB_BIND") {
            self.web.bind_address = val;
        }
        if let Some(val) = lookup("SL_WEB_STATIC_DIR") {
            self.web.static_dir = Some(expand_path(&PathBuf::from(val)));
        }
    }

    /// Validate configuration.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when validation rules are violated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.global.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.global.log_level,
                valid_levels.join(", ")
            )));
        }

        if self.web.port == 0 {
            return Err(ConfigError::ValidationError(
                "web.port must be > 0".to_string(),
            ));
        }

        if self.web.bind_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "web.bind_address must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// `host:port` the HTTP server binds to
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.web.bind_address, self.web.port)
    }

    /// Render this configuration as TOML.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Starter config file with every option spelled out.
    #[must_use]
    pub fn generate_default_toml() -> String {
        r#"# snowlens configuration

[global]
# trace, debug, info, warn, error
log_level = "info"
json_logs = false
# Seed the store from a JSON fixture file instead of the built-in sample data
# fixtures_path = "~/snowlens/fixtures.json"

[web]
bind_address = "127.0.0.1"
port = 5000
cors_enabled = false
cors_origins = []
# Serve a pre-built dashboard bundle for non-API paths
# static_dir = "web/dist"
"#
        .to_string()
    }
}
