use crate::Result;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Key value the example configuration ships with; treated as "not configured".
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// Environment variables consulted, in order, when no key is set in the config file.
pub const API_KEY_ENV_VARS: &[&str] = &["API_KEY", "GEMINI_API_KEY"];

/// Completion backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// Relay proxy that holds the API key server-side
    #[serde(rename = "relay")]
    Relay {
        /// Full URL of the chat endpoint (e.g. "http://localhost:3000/api/chat")
        #[serde(default = "default_relay_endpoint")]
        endpoint: String,
    },
    /// Direct calls to the Gemini generateContent API
    #[serde(rename = "gemini")]
    Gemini {
        /// API key; falls back to `API_KEY` / `GEMINI_API_KEY`
        #[serde(default)]
        api_key: String,
        /// Model name (e.g., "gemini-2.5-flash")
        #[serde(default = "default_gemini_model")]
        model: String,
        /// Base URL for the API
        #[serde(default = "default_gemini_base_url")]
        base_url: String,
    },
    /// Canned responses read from a TOML file
    #[serde(rename = "mock")]
    Mock {
        #[serde(default)]
        responses_file: Option<PathBuf>,
    },
}

fn default_relay_endpoint() -> String {
    "http://localhost:3000/api/chat".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Relay { endpoint: default_relay_endpoint() }
    }
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderConfig::Relay { .. } => "relay",
            ProviderConfig::Gemini { .. } => "gemini",
            ProviderConfig::Mock { .. } => "mock",
        }
    }

    /// Fill an empty Gemini key from the environment.
    pub fn with_env_api_key(self) -> Self {
        match self {
            ProviderConfig::Gemini { api_key, model, base_url } if api_key.trim().is_empty() => {
                let api_key = API_KEY_ENV_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
                    .unwrap_or_default();
                ProviderConfig::Gemini { api_key, model, base_url }
            }
            other => other,
        }
    }
}

/// Sampling parameters sent with every completion call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    1000
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { temperature: default_temperature(), max_output_tokens: default_max_output_tokens() }
    }
}

/// Where conversation state and preferences live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite database path; defaults to `~/.relaychat/store.db`
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Per-value quota in bytes
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,
}

fn default_max_value_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: None, max_value_bytes: default_max_value_bytes() }
    }
}

impl StorageConfig {
    /// Resolve the database path, falling back to the home directory.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| crate::Error::Config("Could not determine home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".relaychat").join("store.db"))
    }
}

/// Input and prompt template settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    #[serde(default = "default_templates")]
    pub templates: Vec<String>,
}

fn default_max_message_length() -> usize {
    2000
}

fn default_templates() -> Vec<String> {
    vec![
        "Explain this in simple terms:".to_string(),
        "Summarize the following:".to_string(),
        "Review this code and suggest improvements:".to_string(),
        "Translate the following into English:".to_string(),
    ]
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { max_message_length: default_max_message_length(), templates: default_templates() }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty`, `json` or `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: FileLoggingConfig,
    #[serde(default)]
    pub privacy: PrivacyLoggingConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: FileLoggingConfig::default(),
            privacy: PrivacyLoggingConfig::default(),
        }
    }
}

/// `[logging.file]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_file_log_level")]
    pub level: String,
    /// Directory for rolling log files; defaults to `~/.relaychat/logs`
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_file_log_level() -> String {
    "debug".to_string()
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, level: default_file_log_level(), directory: None }
    }
}

/// `[logging.privacy]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacyLoggingConfig {
    /// `none`, `truncate` or `full`
    #[serde(default = "default_log_content")]
    pub log_content: String,
    #[serde(default = "default_truncate_length")]
    pub truncate_length: usize,
}

fn default_log_content() -> String {
    "truncate".to_string()
}

fn default_truncate_length() -> usize {
    80
}

impl Default for PrivacyLoggingConfig {
    fn default() -> Self {
        Self { log_content: default_log_content(), truncate_length: default_truncate_length() }
    }
}

/// Top-level configuration loaded from `relaychat.toml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| crate::Error::Config(ConfigError::from(e).to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        use crate::Error;

        let temperature = self.generation.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(Error::Config(ConfigError::OutOfRange(format!("temperature {}", temperature)).to_string()));
        }

        if self.generation.max_output_tokens == 0 {
            return Err(Error::Config(
                ConfigError::OutOfRange("max_output_tokens must be positive".to_string()).to_string(),
            ));
        }

        if self.ui.max_message_length == 0 {
            return Err(Error::Config(
                ConfigError::OutOfRange("max_message_length must be positive".to_string()).to_string(),
            ));
        }

        if let ProviderConfig::Relay { endpoint } = &self.provider
            && !endpoint.trim().is_empty()
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(Error::Config(ConfigError::InvalidEndpoint(endpoint.clone()).to_string()));
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# relaychat configuration
# Copy this file to ~/.relaychat/config.toml and customize as needed

[provider]
# Provider type: "relay", "gemini" or "mock"
provider = "relay"
# Chat endpoint of the relay server
endpoint = "http://localhost:3000/api/chat"

# Direct Gemini access instead of the relay:
# provider = "gemini"
# api_key = "your-api-key-here"   # or set API_KEY in .env
# model = "gemini-2.5-flash"

[generation]
temperature = 0.7
max_output_tokens = 1000

[storage]
# path = "/home/me/.relaychat/store.db"
max_value_bytes = 5242880

[ui]
max_message_length = 2000
templates = [
    "Explain this in simple terms:",
    "Summarize the following:",
    "Review this code and suggest improvements:",
    "Translate the following into English:",
]

[logging]
level = "warn"
format = "pretty"

[logging.file]
enabled = false
level = "debug"
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Value outside its accepted range
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// Relay endpoint is not an http(s) URL
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
