//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::view::{DisplayZone, RangeMode};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("bpbook").join("bpbook.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./bpbook.db".to_string())
}

fn default_storage_key() -> String {
    crate::storage::DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            key: default_storage_key(),
        }
    }
}

/// Chart configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_enabled")]
    pub enabled: bool,

    #[serde(default = "default_chart_width")]
    pub width: u32,

    #[serde(default = "default_chart_height")]
    pub height: u32,

    #[serde(default = "default_range")]
    pub default_range: String,
}

fn default_chart_enabled() -> bool {
    true
}

fn default_chart_width() -> u32 {
    800
}

fn default_chart_height() -> u32 {
    400
}

fn default_range() -> String {
    "30".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: default_chart_enabled(),
            width: default_chart_width(),
            height: default_chart_height(),
            default_range: default_range(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// `local`, `utc` or a fixed offset such as `+09:00`
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_time_zone() -> String {
    "local".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
        }
    }
}

/// Web front end configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8085
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl WebConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load an explicitly named file, or fall back to the default locations
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("bpbook").join("config.toml")),
            Some(PathBuf::from("./bpbook.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Storage overrides
        if let Ok(db_path) = std::env::var("BPBOOK_DB_PATH") {
            self.storage.db_path = db_path;
        }
        if let Ok(key) = std::env::var("BPBOOK_STORAGE_KEY") {
            self.storage.key = key;
        }

        // Web overrides
        if let Ok(host) = std::env::var("BPBOOK_WEB_HOST") {
            self.web.host = host;
        }
        if let Ok(port) = std::env::var("BPBOOK_WEB_PORT") {
            if let Ok(p) = port.parse() {
                self.web.port = p;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("BPBOOK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BPBOOK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Database path with a leading `~/` expanded
    pub fn db_path(&self) -> PathBuf {
        expand_home(&self.storage.db_path)
    }

    /// The configured default chart range
    pub fn default_range(&self) -> Result<RangeMode, ConfigError> {
        self.chart
            .default_range
            .parse()
            .map_err(|e: crate::view::ParseRangeModeError| ConfigError::Invalid {
                field: "chart.default_range",
                error: e.to_string(),
            })
    }

    /// The configured display time zone
    pub fn display_zone(&self) -> Result<DisplayZone, ConfigError> {
        DisplayZone::parse(&self.view.time_zone).ok_or_else(|| ConfigError::Invalid {
            field: "view.time_zone",
            error: format!("unknown time zone {:?}", self.view.time_zone),
        })
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid value for {field}: {error}")]
    Invalid { field: &'static str, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# bpbook Configuration
#
# Environment variables override these settings:
# - BPBOOK_DB_PATH
# - BPBOOK_STORAGE_KEY
# - BPBOOK_WEB_HOST
# - BPBOOK_WEB_PORT
# - BPBOOK_LOG_LEVEL
# - BPBOOK_LOG_FORMAT

[storage]
# SQLite file holding the measurement log
db_path = "~/.local/share/bpbook/bpbook.db"

# Key the entry collection is stored under
key = "bpbook_entries_v1"

[chart]
# Draw the chart (set to false to skip chart rendering entirely)
enabled = true

# Chart size in pixels
width = 800
height = 400

# Default chart range: "30", "90" or "all"
default_range = "30"

[view]
# Time zone for displayed times: "local", "utc" or an offset like "+09:00"
time_zone = "local"

[web]
# Web front end host (keep it on loopback, there is no authentication)
host = "127.0.0.1"

# Web front end port
port = 8085

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json
format = "pretty"
"#
    .to_string()
}
