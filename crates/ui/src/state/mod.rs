mod input;
mod views;

pub use input::{InputState, MAX_INPUT_ROWS};
pub use views::{
    COPY_FEEDBACK_DURATION, CopyFeedback, MessageAction, MessageView, TranscriptView, ViewKind, WELCOME_TEXT,
};

use relaychat_core::Preferences;

/// Where key presses go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    /// Moving between messages to copy, edit or regenerate
    Transcript,
}

/// Overlay that captures all keys while open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    ConfirmClear,
    Templates { selected: usize },
}

/// UI state that is not part of the transcript
#[derive(Debug)]
pub struct AppState {
    pub input: InputState,
    pub preferences: Preferences,
    pub templates: Vec<String>,
    pub focus: Focus,
    /// Position in the view list, not a transcript index
    pub selected: Option<usize>,
    pub modal: Option<Modal>,
    /// Mirrors the controller's busy flag; disables sending
    pub busy: bool,
    /// One-line message in the hints row (export path, copy failures)
    pub notice: Option<String>,
    pub provider_name: String,
}

impl AppState {
    pub fn new(preferences: Preferences, templates: Vec<String>, max_message_length: usize) -> Self {
        Self {
            input: InputState::new(max_message_length),
            preferences,
            templates,
            focus: Focus::Input,
            selected: None,
            modal: None,
            busy: false,
            notice: None,
            provider_name: String::new(),
        }
    }

    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    /// Enter selection mode on the newest message.
    pub fn focus_transcript(&mut self, view_count: usize) {
        if view_count == 0 {
            return;
        }
        self.focus = Focus::Transcript;
        self.selected = Some(view_count - 1);
    }

    pub fn focus_input(&mut self) {
        self.focus = Focus::Input;
        self.selected = None;
    }

    pub fn select_prev(&mut self) {
        if let Some(selected) = self.selected.as_mut() {
            *selected = selected.saturating_sub(1);
        }
    }

    pub fn select_next(&mut self, view_count: usize) {
        if let Some(selected) = self.selected.as_mut()
            && *selected + 1 < view_count
        {
            *selected += 1;
        }
    }

    /// Keep the selection inside a view list that may have shrunk.
    pub fn clamp_selection(&mut self, view_count: usize) {
        if view_count == 0 {
            self.focus_input();
        } else if let Some(selected) = self.selected.as_mut() {
            *selected = (*selected).min(view_count - 1);
        }
    }

    pub fn open_templates(&mut self) {
        if self.templates.is_empty() {
            return;
        }
        let selected = self
            .preferences
            .last_template()
            .and_then(|last| self.templates.iter().position(|t| t == last))
            .unwrap_or(0);
        self.modal = Some(Modal::Templates { selected });
    }

    /// Append the template to the input and remember it.
    pub fn insert_template(&mut self, position: usize) {
        let Some(template) = self.templates.get(position).cloned() else {
            return;
        };
        self.input.insert_template(&template);
        self.preferences.set_last_template(&template);
        self.focus_input();
    }
}
