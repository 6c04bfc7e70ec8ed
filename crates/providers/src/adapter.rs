use reqwest::{Client as HttpClient, StatusCode, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use crate::health::HealthCheckResult;
use crate::mock::MockProvider;
use crate::types::*;
use relaychat_core::config::PLACEHOLDER_API_KEY;
use relaychat_core::{CompletionError, ProviderConfig, Result};

/// Backend that turns a transcript into the next assistant turn.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Short name for logs and the status command.
    fn name(&self) -> &str;

    /// Whether an endpoint and credential are available at all.
    fn is_configured(&self) -> bool;

    /// One request/response round trip.
    async fn complete(&self, request: CompletionRequest) -> std::result::Result<String, CompletionError>;

    /// Cheap reachability probe.
    async fn health_check(&self) -> HealthCheckResult;
}

/// Relay server that keeps the API key out of the client.
pub struct RelayProvider {
    client: HttpClient,
    endpoint: String,
}

impl RelayProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { client: HttpClient::new(), endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `GET /api/health` next to the chat endpoint.
    fn health_url(&self) -> std::result::Result<Url, String> {
        let url = Url::parse(&self.endpoint).map_err(|e| format!("invalid endpoint: {}", e))?;
        url.join("health").map_err(|e| format!("invalid endpoint: {}", e))
    }

    /// Map a relay reply onto the completion error taxonomy.
    fn classify(status: StatusCode, body: RelayResponse) -> std::result::Result<String, CompletionError> {
        if status.is_success() {
            return match body.text {
                Some(text) if !text.trim().is_empty() => Ok(text),
                _ => Err(CompletionError::EmptyResponse),
            };
        }

        let message = body
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| format!("API request failed with status {}", status.as_u16()));
        let lowered = message.to_lowercase();

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
            || (status == StatusCode::INTERNAL_SERVER_ERROR && lowered.contains("not configured"))
        {
            return Err(CompletionError::Configuration(message));
        }

        if status == StatusCode::BAD_GATEWAY && lowered.contains("empty response") {
            return Err(CompletionError::EmptyResponse);
        }

        Err(CompletionError::request(Some(status.as_u16()), message))
    }
}

#[async_trait::async_trait]
impl Provider for RelayProvider {
    fn name(&self) -> &str {
        "relay"
    }

    fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    async fn complete(&self, request: CompletionRequest) -> std::result::Result<String, CompletionError> {
        if !self.is_configured() {
            return Err(CompletionError::configuration("No relay endpoint configured"));
        }

        let body = request.to_chat_request();
        tracing::debug!(endpoint = %self.endpoint, turns = body.contents.len(), "relay request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::request(None, format!("Relay request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| CompletionError::request(Some(status.as_u16()), e.to_string()))?;
        let parsed = serde_json::from_str::<RelayResponse>(&text).unwrap_or_default();

        Self::classify(status, parsed)
    }

    async fn health_check(&self) -> HealthCheckResult {
        let url = match self.health_url() {
            Ok(url) => url,
            Err(e) => return HealthCheckResult::unhealthy(e),
        };

        let start = Instant::now();
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                HealthCheckResult::healthy(start.elapsed().as_millis() as u64)
            }
            Ok(response) => {
                let status = response.status();
                let body = response.json::<RelayResponse>().await.unwrap_or_default();
                HealthCheckResult::unhealthy(
                    body.error.unwrap_or_else(|| format!("health check returned status {}", status.as_u16())),
                )
            }
            Err(e) => HealthCheckResult::unhealthy(format!("Health check failed: {}", e)),
        }
    }
}

/// Direct calls to Gemini `generateContent`.
pub struct GeminiProvider {
    client: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, base_url: Option<String>) -> Self {
        Self {
            client: HttpClient::new(),
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string()),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent?key={}", self.base_url, self.model, self.api_key)
    }

    fn extract_text(response: GeminiResponse) -> Option<String> {
        response
            .candidates?
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}

#[async_trait::async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && key != PLACEHOLDER_API_KEY
    }

    async fn complete(&self, request: CompletionRequest) -> std::result::Result<String, CompletionError> {
        if !self.is_configured() {
            return Err(CompletionError::configuration(
                "API key not configured. Please add your API key to the .env file",
            ));
        }

        let body = request.to_chat_request();
        tracing::debug!(model = %self.model, turns = body.contents.len(), "gemini request");

        let response = self
            .client
            .post(self.generate_url())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::request(None, format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| CompletionError::request(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorEnvelope>(&text)
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| format!("API request failed with status {}", status.as_u16()));

            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                return Err(CompletionError::Configuration(message));
            }
            return Err(CompletionError::request(Some(status.as_u16()), message));
        }

        let parsed = serde_json::from_str::<GeminiResponse>(&text)
            .map_err(|e| CompletionError::request(Some(status.as_u16()), format!("Malformed Gemini response: {}", e)))?;

        Self::extract_text(parsed).ok_or(CompletionError::EmptyResponse)
    }

    async fn health_check(&self) -> HealthCheckResult {
        if !self.is_configured() {
            return HealthCheckResult::unhealthy("API key not configured".to_string());
        }

        let url = format!("{}/models/{}?key={}", self.base_url, self.model, self.api_key);
        let start = Instant::now();
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                HealthCheckResult::healthy(start.elapsed().as_millis() as u64)
            }
            Ok(response) => {
                HealthCheckResult::unhealthy(format!("Gemini returned status {}", response.status().as_u16()))
            }
            Err(e) => HealthCheckResult::unhealthy(format!("Health check failed: {}", e)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: Option<GeminiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: Option<String>,
}

/// Factory to create providers from config
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_from_config(config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
        match config {
            ProviderConfig::Relay { endpoint } => Ok(Arc::new(RelayProvider::new(endpoint.clone()))),
            ProviderConfig::Gemini { api_key, model, base_url } => Ok(Arc::new(GeminiProvider::new(
                api_key.clone(),
                model.clone(),
                Some(base_url.clone()),
            ))),
            ProviderConfig::Mock { responses_file } => {
                Ok(Arc::new(MockProvider::from_file(responses_file.as_deref())?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaychat_core::{GenerationConfig, Message};

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("test-key".to_string(), "gemini-2.5-flash".to_string(), None);
        assert_eq!(provider.base_url, "https://generativelanguage.googleapis.com/v1beta");
        assert_eq!(
            provider.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=test-key"
        );
        assert!(provider.is_configured());
    }

    #[test]
    fn test_gemini_placeholder_key_is_unconfigured() {
        let provider = GeminiProvider::new(PLACEHOLDER_API_KEY.to_string(), "m".to_string(), None);
        assert!(!provider.is_configured());

        let provider = GeminiProvider::new("  ".to_string(), "m".to_string(), None);
        assert!(!provider.is_configured());
    }

    #[test]
    fn test_gemini_extract_text() {
        let response: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"hello"}]}}]}"#).unwrap();
        assert_eq!(GeminiProvider::extract_text(response), Some("hello".to_string()));

        let response: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(GeminiProvider::extract_text(response), None);

        let response: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#).unwrap();
        assert_eq!(GeminiProvider::extract_text(response), None);
    }

    #[test]
    fn test_relay_health_url() {
        let provider = RelayProvider::new("http://localhost:3000/api/chat");
        assert_eq!(provider.health_url().unwrap().as_str(), "http://localhost:3000/api/health");
    }

    #[test]
    fn test_relay_classify_success() {
        let body = RelayResponse { text: Some("hi".to_string()), error: None };
        assert_eq!(RelayProvider::classify(StatusCode::OK, body), Ok("hi".to_string()));

        let body = RelayResponse { text: Some(" ".to_string()), error: None };
        assert_eq!(RelayProvider::classify(StatusCode::OK, body), Err(CompletionError::EmptyResponse));
    }

    #[test]
    fn test_relay_classify_failures() {
        let body = RelayResponse { text: None, error: Some("Server API key is not configured.".to_string()) };
        assert!(RelayProvider::classify(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err().is_configuration());

        let body = RelayResponse { text: None, error: Some("Gemini returned an empty response.".to_string()) };
        assert_eq!(RelayProvider::classify(StatusCode::BAD_GATEWAY, body), Err(CompletionError::EmptyResponse));

        let err = RelayProvider::classify(StatusCode::BAD_REQUEST, RelayResponse::default()).unwrap_err();
        assert_eq!(err, CompletionError::request(Some(400), "API request failed with status 400"));
    }

    #[test]
    fn test_factory_relay() {
        let config = ProviderConfig::Relay { endpoint: "http://localhost:3000/api/chat".to_string() };
        let provider = ProviderFactory::create_from_config(&config).unwrap();
        assert_eq!(provider.name(), "relay");
        assert!(provider.is_configured());
    }

    #[tokio::test]
    async fn test_factory_relay_empty_endpoint_is_unconfigured() {
        let provider = ProviderFactory::create_from_config(&ProviderConfig::Relay { endpoint: String::new() }).unwrap();
        assert!(!provider.is_configured());

        let request = CompletionRequest::new(vec![Message::user("hi")], GenerationConfig::default());
        let err = provider.complete(request).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_factory_mock_without_file() {
        let provider = ProviderFactory::create_from_config(&ProviderConfig::Mock { responses_file: None }).unwrap();
        assert_eq!(provider.name(), "mock");
    }
}
