use crate::Provider;
use crate::health::HealthCheckResult;
use crate::types::CompletionRequest;
use relaychat_core::{CompletionError, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned outcome of one completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MockResponse {
    Text { content: String },
    Error { message: String },
    Empty,
    Unconfigured { message: String },
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }

    fn into_result(self) -> std::result::Result<String, CompletionError> {
        match self {
            MockResponse::Text { content } => Ok(content),
            MockResponse::Error { message } => Err(CompletionError::request(Some(500), message)),
            MockResponse::Empty => Err(CompletionError::EmptyResponse),
            MockResponse::Unconfigured { message } => Err(CompletionError::Configuration(message)),
        }
    }
}

/// Mock configuration from TOML file
#[derive(Debug, Deserialize)]
struct MockConfig {
    responses: Vec<MockResponse>,
}

/// Deterministic provider replaying queued responses in order
pub struct MockProvider {
    responses: Vec<MockResponse>,
    current: AtomicUsize,
    configured: bool,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self { responses, current: AtomicUsize::new(0), configured: true, requests: Mutex::new(Vec::new()) }
    }

    /// Load `[[responses]]` from a TOML file; without a file a single placeholder reply is queued.
    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::with_responses(vec![MockResponse::text(
                "Mock response - configure responses_file in config",
            )]));
        };

        let content = fs::read_to_string(path)?;
        let config = toml::from_str::<MockConfig>(&content)
            .map_err(|e| Error::Config(format!("Failed to parse mock responses: {}", e)))?;
        tracing::debug!(path = %path.display(), count = config.responses.len(), "loaded mock responses");

        Ok(Self::with_responses(config.responses))
    }

    /// Provider that reports no credential, like an unset API key.
    pub fn unconfigured() -> Self {
        Self { configured: false, ..Self::with_responses(Vec::new()) }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> MockResponse {
        let index = self.current.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(index) {
            Some(response) => response.clone(),
            None => MockResponse::text(format!(
                "No more mock responses configured (requested: {}, available: {})",
                index + 1,
                self.responses.len()
            )),
        }
    }
}

#[async_trait::async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, request: CompletionRequest) -> std::result::Result<String, CompletionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if !self.configured {
            return Err(CompletionError::configuration("API key not configured"));
        }

        self.next_response().into_result()
    }

    async fn health_check(&self) -> HealthCheckResult {
        if self.configured {
            HealthCheckResult::healthy(0)
        } else {
            HealthCheckResult::unhealthy("API key not configured".to_string())
        }
    }
}
