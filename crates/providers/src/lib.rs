pub mod adapter;
pub mod health;
pub mod mock;
pub mod types;

pub use adapter::{GeminiProvider, Provider, ProviderFactory, RelayProvider};
pub use health::{HealthCheckResult, ProviderHealthChecker};
pub use mock::{MockProvider, MockResponse};
pub use types::{ChatRequest, CompletionRequest, Content, GenerationParams, Part, RelayResponse};

pub use relaychat_core::{CompletionError, Error, Result};
