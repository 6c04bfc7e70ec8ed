pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod message;
pub mod preferences;
pub mod storage;
pub mod transcript;

pub use config::{Config, GenerationConfig, ProviderConfig};
pub use error::{CompletionError, Error, Result, StorageError};
pub use export::{ExportArtifact, render_report};
pub use message::{Message, Role};
pub use preferences::{FontSize, Preferences, Theme};
pub use storage::{KeyValueStore, MemoryStore};
pub use transcript::Transcript;
