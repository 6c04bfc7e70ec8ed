//! Logging setup on top of the tracing ecosystem.
//!
//! # Environment Variables
//!
//! - `RELAYCHAT_LOG`: Filter directive (like `RUST_LOG`), e.g., `relaychat=debug`
//! - `RELAYCHAT_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `RELAYCHAT_LOG_DIR`: Directory for rolling log files (default `~/.relaychat/logs`)
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "pretty"
//!
//! [logging.file]
//! enabled = true
//! level = "debug"
//!
//! [logging.privacy]
//! log_content = "truncate"
//! truncate_length = 80
//! ```
//!
//! The terminal UI owns the screen, so it turns stderr output off and keeps
//! only the file layer:
//!
//! ```no_run
//! use relaychat_core::logging::{self, LoggingConfig};
//!
//! let _guard = logging::init_logging(Some(LoggingConfig::default().without_stderr()))?;
//! # Ok::<(), relaychat_core::Error>(())
//! ```

use crate::Error;
use crate::config::{FileLoggingConfig, LoggingConfig as ConfigLoggingConfig};
use std::env;
use std::io;
use std::path::PathBuf;
pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// How much of a chat message may reach the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentLogging {
    /// Replace content with a placeholder.
    None,
    /// Keep the first `truncate_length` chars.
    #[default]
    Truncate,
    /// Log everything.
    Full,
}

impl ContentLogging {
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(ContentLogging::None),
            "truncate" => Some(ContentLogging::Truncate),
            "full" => Some(ContentLogging::Full),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentLogging::None => "none",
            ContentLogging::Truncate => "truncate",
            ContentLogging::Full => "full",
        }
    }
}

/// Privacy configuration for message content in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivacyConfig {
    pub log_content: ContentLogging,
    pub truncate_length: usize,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self { log_content: ContentLogging::default(), truncate_length: 80 }
    }
}

/// Runtime logging configuration, built from the `[logging]` section.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level.
    pub level: String,
    /// Output format for stderr.
    pub format: LogFormat,
    /// Write events to stderr.
    pub stderr: bool,
    /// File logging configuration (optional).
    pub file: Option<FileLoggingConfig>,
    pub privacy: PrivacyConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
            stderr: true,
            file: None,
            privacy: PrivacyConfig::default(),
        }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        let format = LogFormat::parse_str(&config.format).unwrap_or_default();
        let log_content = ContentLogging::parse_str(&config.privacy.log_content).unwrap_or_default();

        Self {
            level: config.level,
            format,
            stderr: true,
            file: if config.file.enabled { Some(config.file) } else { None },
            privacy: PrivacyConfig { log_content, truncate_length: config.privacy.truncate_length },
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file = Some(config);
        self
    }

    /// Disable the stderr layer (file logging only).
    pub fn without_stderr(mut self) -> Self {
        self.stderr = false;
        self
    }

    pub fn with_privacy(mut self, config: PrivacyConfig) -> Self {
        self.privacy = config;
        self
    }

    /// Build an EnvFilter from this config and environment variables.
    fn build_env_filter(&self) -> EnvFilter {
        let filter = env::var("RELAYCHAT_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.level.clone());

        EnvFilter::new(filter)
    }

    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    /// Determine the appropriate format for stderr output.
    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("RELAYCHAT_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        if self.format != LogFormat::Pretty {
            return self.format;
        }

        if Self::is_tty() { LogFormat::Pretty } else { LogFormat::Compact }
    }

    fn log_dir(file: &FileLoggingConfig) -> Result<PathBuf, Error> {
        if let Ok(custom_dir) = env::var("RELAYCHAT_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        if let Some(dir) = &file.directory {
            return Ok(dir.clone());
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".relaychat").join("logs"))
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn stderr_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer {
    match format {
        LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).with_ansi(true).with_filter(filter).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(io::stderr).with_filter(filter).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).with_filter(filter).boxed(),
    }
}

/// Initialize the global tracing subscriber.
///
/// Returns the file writer guard when file logging is enabled; it must be held
/// for the lifetime of the program or buffered events are lost.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<WorkerGuard>, Error> {
    let config = config.unwrap_or_default();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.stderr {
        layers.push(stderr_layer(config.detect_format(), config.build_env_filter()));
    }

    let mut guard = None;
    if let Some(file_config) = &config.file {
        let log_dir = LoggingConfig::log_dir(file_config)?;
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "relaychat.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        layers.push(
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new(&file_config.level))
                .boxed(),
        );
        guard = Some(file_guard);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}

/// Shorten message content for log output according to privacy settings.
pub fn redact_content(content: &str, privacy: &PrivacyConfig) -> String {
    match privacy.log_content {
        ContentLogging::None => format!("[{} chars]", content.chars().count()),
        ContentLogging::Full => content.to_string(),
        ContentLogging::Truncate => {
            let total = content.chars().count();
            if total <= privacy.truncate_length {
                return content.to_string();
            }
            let mut truncated = content.chars().take(privacy.truncate_length).collect::<String>();
            truncated.push_str(&format!("... ({} total chars)", total));
            truncated
        }
    }
}
