use serde::{Deserialize, Serialize};
use relaychat_core::{GenerationConfig, Message};

/// Input to a single completion call: the ordered turns plus sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub generation: GenerationConfig,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>, generation: GenerationConfig) -> Self {
        Self { messages, generation }
    }

    /// Wire body shared by the relay and the Gemini API.
    pub fn to_chat_request(&self) -> ChatRequest {
        ChatRequest {
            contents: self.messages.iter().map(Content::from).collect(),
            generation_config: GenerationParams {
                temperature: self.generation.temperature,
                max_output_tokens: self.generation.max_output_tokens,
            },
        }
    }
}

/// `{contents, generationConfig}` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`
    pub role: String,
    pub parts: Vec<Part>,
}

impl From<&Message> for Content {
    fn from(message: &Message) -> Self {
        Self { role: message.role.api_label().to_string(), parts: vec![Part { text: message.content.clone() }] }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Relay reply: `{text}` on success, `{error}` otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
