/// Text shown while idle.
pub const READY: &str = "Ready";
/// Text shown while a completion is outstanding.
pub const THINKING: &str = "Thinking...";
pub const ERROR_OCCURRED: &str = "Error occurred";
pub const CHAT_CLEARED: &str = "Chat cleared";
pub const KEY_NOT_CONFIGURED: &str = "API key not configured";

/// Rendered once at startup when the provider has no credential.
pub const CONFIGURATION_WARNING: &str =
    "Warning: Please configure your API key in the .env file to use the AI chat functionality.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ready,
    Processing,
    Error,
}

/// Status indicator: a colored dot plus a short label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn ready(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Ready, text: text.into() }
    }

    pub fn processing(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Processing, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, text: text.into() }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ready(READY)
    }
}

/// Inline error text for a failed call.
pub fn error_view_text(message: &str) -> String {
    format!("Error: {}. Please check your API configuration.", message.trim_end_matches('.'))
}
