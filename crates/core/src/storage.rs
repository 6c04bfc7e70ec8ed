//! Key-value persistence for conversation state and preferences.
//!
//! Values are plain strings in four named slots. The conversation slot holds a
//! JSON array of `{role, content}` records.

use crate::error::StorageError;
use crate::message::Message;
use crate::transcript::Transcript;

use std::collections::HashMap;
use std::sync::Mutex;

/// Slot holding the serialized transcript.
pub const CONVERSATION_KEY: &str = "chatConversation";
/// Slot holding `light` or `dark`.
pub const THEME_KEY: &str = "chatTheme";
/// Slot holding `small`, `medium` or `large`.
pub const FONT_SIZE_KEY: &str = "chatFontSize";
/// Slot holding the last inserted prompt template.
pub const LAST_TEMPLATE_KEY: &str = "chatLastTemplate";

/// String key-value store shared by the controller and the preference layer.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reject values larger than `limit` bytes.
pub fn check_quota(key: &str, value: &str, limit: Option<usize>) -> Result<(), StorageError> {
    match limit {
        Some(limit) if value.len() > limit => {
            Err(StorageError::QuotaExceeded { key: key.to_string(), size: value.len(), limit })
        }
        _ => Ok(()),
    }
}

/// Serialize the transcript into the conversation slot.
pub fn save_transcript(store: &dyn KeyValueStore, transcript: &Transcript) -> Result<(), StorageError> {
    let json = serde_json::to_string(transcript.entries()).map_err(|e| StorageError::write(CONVERSATION_KEY, e))?;
    store.set(CONVERSATION_KEY, &json)
}

/// Read the transcript from the conversation slot; a missing slot is an empty transcript.
pub fn load_transcript(store: &dyn KeyValueStore) -> Result<Transcript, StorageError> {
    let Some(json) = store.get(CONVERSATION_KEY)? else {
        return Ok(Transcript::new());
    };

    let records: Vec<Message> = serde_json::from_str(&json).map_err(|e| StorageError::corrupt(CONVERSATION_KEY, e))?;
    Ok(Transcript::from_messages(records))
}

/// In-process store, used for `--ephemeral` sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects values larger than `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self { values: Mutex::new(HashMap::new()), quota: Some(limit) }
    }

    fn lock(&self, key: &str) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.values.lock().map_err(|_| StorageError::read(key, "store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock(key)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(key, value, self.quota)?;
        self.lock(key)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock(key)?.remove(key);
        Ok(())
    }
}
