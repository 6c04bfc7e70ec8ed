use crate::Provider;
use std::sync::Arc;
use std::time::Duration;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckResult {
    pub healthy: bool,
    pub latency_ms: u64,
    pub error: Option<String>,
}

impl HealthCheckResult {
    pub fn healthy(latency_ms: u64) -> Self {
        Self { healthy: true, latency_ms, error: None }
    }

    pub fn unhealthy(error: String) -> Self {
        Self { healthy: false, latency_ms: 0, error: Some(error) }
    }
}

/// Runs a provider's health probe under a deadline.
pub struct ProviderHealthChecker {
    provider: Arc<dyn Provider>,
    timeout: Duration,
}

impl ProviderHealthChecker {
    pub fn new(provider: Arc<dyn Provider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn check(&self) -> HealthCheckResult {
        match tokio::time::timeout(self.timeout, self.provider.health_check()).await {
            Ok(result) => result,
            Err(_) => HealthCheckResult::unhealthy(format!("Health check timed out after {:?}", self.timeout)),
        }
    }
}
