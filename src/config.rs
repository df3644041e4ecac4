//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::assistant::GeminiConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("docqueue").to_string_lossy().to_string())
        .unwrap_or_else(|| "./docqueue_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~/` expanded
    pub fn data_path(&self) -> PathBuf {
        match (self.data_dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.data_dir),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8086
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// AI assistant configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_url")]
    pub api_url: String,

    #[serde(default = "default_assistant_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_assistant_timeout")]
    pub request_timeout_secs: u64,
}

fn default_assistant_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_assistant_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_assistant_timeout() -> u64 {
    60
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_url: default_assistant_url(),
            model: default_assistant_model(),
            api_key: None,
            request_timeout_secs: default_assistant_timeout(),
        }
    }
}

impl AssistantConfig {
    /// Client settings for the Gemini backend
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            base_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            request_timeout_ms: self.request_timeout_secs * 1000,
        }
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

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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

    /// Load from an explicit path, default locations, or environment
    pub fn load_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_with_env(path);
        }

        let config_paths = [
            dirs::config_dir().map(|p| p.join("docqueue").join("config.toml")),
            Some(PathBuf::from("./docqueue.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Ok(Self::from_env())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = lookup("DOCQUEUE_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(host) = lookup("DOCQUEUE_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("DOCQUEUE_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid DOCQUEUE_API_PORT: {}", port),
            }
        }

        if let Some(url) = lookup("DOCQUEUE_ASSISTANT_URL") {
            self.assistant.api_url = url;
        }
        if let Some(model) = lookup("DOCQUEUE_ASSISTANT_MODEL") {
            self.assistant.model = model;
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.assistant.api_key = Some(key);
        }

        if let Some(level) = lookup("DOCQUEUE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("DOCQUEUE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# DocQueue Configuration
#
# Environment variables override these settings:
# - DOCQUEUE_DATA_DIR
# - DOCQUEUE_API_HOST
# - DOCQUEUE_API_PORT
# - DOCQUEUE_ASSISTANT_URL
# - DOCQUEUE_ASSISTANT_MODEL
# - GEMINI_API_KEY
# - DOCQUEUE_LOG_LEVEL
# - DOCQUEUE_LOG_FORMAT

[storage]
# Directory holding the users, appointments and session documents
data_dir = "~/.local/share/docqueue"

[api]
# API server host
host = "127.0.0.1"

# API server port
port = 8086

[assistant]
# Generative Language API base URL
api_url = "https://generativelanguage.googleapis.com/v1beta"

# Model used for drafting diagnoses and prescriptions
model = "gemini-2.5-flash"

# API key (prefer the GEMINI_API_KEY environment variable)
# api_key = ""

# Request timeout in seconds (0 = no timeout)
request_timeout_secs = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
