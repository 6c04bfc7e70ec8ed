use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Role name on the completion wire format.
    pub fn api_label(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "model",
        }
    }

    /// Label used in exported reports.
    pub fn display_label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "AI Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One turn of the conversation. Identity is its position in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.api_label(), "user");
        assert_eq!(Role::Assistant.api_label(), "model");
        assert_eq!(Role::Assistant.display_label(), "AI Assistant");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn test_message_serializes_as_record() {
        let json = serde_json::to_string(&Message::assistant("hello")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hello"}"#);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = serde_json::from_str::<Message>(r#"{"role":"system","content":"x"}"#);
        assert!(result.is_err());
    }
}
