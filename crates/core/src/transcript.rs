use crate::message::{Message, Role};

/// Ordered, index-addressable conversation history.
///
/// Roles are expected to alternate but nothing here enforces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(entries: Vec<Message>) -> Self {
        Self { entries }
    }

    /// Append an entry and return its index.
    ///
    /// Content that is empty after trimming is ignored.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> Option<usize> {
        let content = content.into();
        if content.trim().is_empty() {
            return None;
        }
        self.entries.push(Message::new(role, content));
        Some(self.entries.len() - 1)
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    /// Keep only the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Nearest user entry strictly before `index`, scanning backward.
    pub fn nearest_user_before(&self, index: usize) -> Option<usize> {
        let end = index.min(self.entries.len());
        self.entries[..end].iter().rposition(Message::is_user)
    }

    /// True when the last entry is a user turn with no reply (a failed send).
    pub fn awaiting_reply(&self) -> bool {
        self.last().is_some_and(Message::is_user)
    }
}
