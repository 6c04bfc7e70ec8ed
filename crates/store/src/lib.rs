//! SQLite-backed key-value store for conversation state and preferences.
//!
//! # Example
//!
//! ```no_run
//! use relaychat_core::KeyValueStore;
//! use relaychat_store::SqliteStore;
//!
//! let store = SqliteStore::open(std::path::Path::new("/tmp/relaychat.db"))?;
//! store.set("chatTheme", "dark")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod kv_store;
mod migration;
mod schema;

pub use error::{Error, Result};
pub use kv_store::SqliteStore;
