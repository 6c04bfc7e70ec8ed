use thiserror::Error;

/// Result type alias for relaychat-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the relaychat client
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Key-value storage errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Completion call errors
    #[error("completion error: {0}")]
    Completion(#[from] CompletionError),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Failure modes of a single completion call.
///
/// Any of these leaves the transcript as it was before the call; only the
/// assistant half of the turn is withheld.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// No endpoint or credential could be resolved
    #[error("{0}")]
    Configuration(String),

    /// The HTTP call did not succeed
    #[error("{message}")]
    Request { status: Option<u16>, message: String },

    /// The call succeeded but carried no usable text
    #[error("empty response from the model")]
    EmptyResponse,
}

impl CompletionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn request(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Request { status, message: message.into() }
    }

    /// Configuration problems are surfaced as a persistent banner instead of an inline error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            _ => None,
        }
    }
}

/// Key-value storage errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be read
    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    /// The backing store rejected a write
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    /// Value exceeds the per-slot quota
    #[error("quota exceeded for '{key}': {size} bytes (limit {limit})")]
    QuotaExceeded { key: String, size: usize, limit: usize },

    /// Stored data could not be decoded
    #[error("corrupt data in '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

impl StorageError {
    pub fn read(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Read { key: key.into(), reason: reason.to_string() }
    }

    pub fn write(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Write { key: key.into(), reason: reason.to_string() }
    }

    pub fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Corrupt { key: key.into(), reason: reason.to_string() }
    }

    /// Slot the failure concerns.
    pub fn key(&self) -> &str {
        match self {
            Self::Read { key, .. } => key,
            Self::Write { key, .. } => key,
            Self::QuotaExceeded { key, .. } => key,
            Self::Corrupt { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("missing endpoint".to_string());
        assert_eq!(err.to_string(), "configuration error: missing endpoint");

        let err = Error::Parse("bad json".to_string());
        assert_eq!(err.to_string(), "parse error: bad json");

        let err = Error::Other("something".to_string());
        assert_eq!(err.to_string(), "something");
    }

    #[test]
    fn test_completion_error_display() {
        let err = CompletionError::configuration("Server API key is not configured.");
        assert_eq!(err.to_string(), "Server API key is not configured.");

        let err = CompletionError::request(Some(502), "Bad gateway");
        assert_eq!(err.to_string(), "Bad gateway");
        assert_eq!(err.status(), Some(502));

        assert_eq!(CompletionError::EmptyResponse.to_string(), "empty response from the model");
        assert_eq!(CompletionError::EmptyResponse.status(), None);
    }

    #[test]
    fn test_completion_error_is_configuration() {
        assert!(CompletionError::configuration("x").is_configuration());
        assert!(!CompletionError::request(None, "x").is_configuration());
        assert!(!CompletionError::EmptyResponse.is_configuration());
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::QuotaExceeded { key: "chatConversation".to_string(), size: 10, limit: 5 };
        assert_eq!(err.to_string(), "quota exceeded for 'chatConversation': 10 bytes (limit 5)");
        assert_eq!(err.key(), "chatConversation");

        let err = StorageError::corrupt("chatTheme", "not utf-8");
        assert_eq!(err.to_string(), "corrupt data in 'chatTheme': not utf-8");
    }

    #[test]
    fn test_error_from_storage_error() {
        let err: Error = StorageError::write("chatTheme", "disk full").into();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(err.to_string(), "storage error: failed to write 'chatTheme': disk full");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<usize> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
