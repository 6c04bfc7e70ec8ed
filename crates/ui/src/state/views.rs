use chrono::{DateTime, Local};
use relaychat_controller::{Renderer, Status};
use relaychat_core::{Message, Role};
use std::time::{Duration, Instant};

/// How long a copy result replaces the copy label.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(1200);

pub const WELCOME_TEXT: &str = "Hello! I'm your AI assistant. How can I help you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Welcome,
    User,
    Assistant,
    Error,
}

impl ViewKind {
    pub fn label(&self) -> &'static str {
        match self {
            ViewKind::Welcome | ViewKind::Assistant => Role::Assistant.display_label(),
            ViewKind::User => Role::User.display_label(),
            ViewKind::Error => "Error",
        }
    }
}

impl From<Role> for ViewKind {
    fn from(role: Role) -> Self {
        match role {
            Role::User => ViewKind::User,
            Role::Assistant => ViewKind::Assistant,
        }
    }
}

/// Per-message control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAction {
    Copy,
    Edit,
    Regenerate,
}

impl MessageAction {
    pub fn key(&self) -> char {
        match self {
            MessageAction::Copy => 'c',
            MessageAction::Edit => 'e',
            MessageAction::Regenerate => 'r',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageAction::Copy => "Copy",
            MessageAction::Edit => "Edit",
            MessageAction::Regenerate => "Regenerate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFeedback {
    Copied,
    Failed,
}

impl CopyFeedback {
    pub fn label(&self) -> &'static str {
        match self {
            CopyFeedback::Copied => "Copied!",
            CopyFeedback::Failed => "Failed",
        }
    }
}

/// One rendered message. Error and welcome views carry no transcript index.
#[derive(Debug, Clone)]
pub struct MessageView {
    pub index: Option<usize>,
    pub kind: ViewKind,
    pub content: String,
    pub created_at: DateTime<Local>,
    copy_feedback: Option<(CopyFeedback, Instant)>,
}

impl MessageView {
    pub fn new(index: Option<usize>, kind: ViewKind, content: impl Into<String>) -> Self {
        Self { index, kind, content: content.into(), created_at: Local::now(), copy_feedback: None }
    }

    pub fn welcome() -> Self {
        Self::new(None, ViewKind::Welcome, WELCOME_TEXT)
    }

    /// `HH:MM`, 24-hour.
    pub fn format_time(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }

    /// Controls offered for this view.
    pub fn actions(&self) -> &'static [MessageAction] {
        match self.kind {
            ViewKind::User => &[MessageAction::Copy, MessageAction::Edit],
            ViewKind::Assistant => &[MessageAction::Copy, MessageAction::Regenerate],
            ViewKind::Welcome => &[MessageAction::Copy],
            ViewKind::Error => &[],
        }
    }

    pub fn supports(&self, action: MessageAction) -> bool {
        self.actions().contains(&action)
    }

    pub fn set_copy_feedback(&mut self, feedback: CopyFeedback, now: Instant) {
        self.copy_feedback = Some((feedback, now));
    }

    /// Label for the copy control at `now`; reverts once the feedback expires.
    pub fn copy_label(&self, now: Instant) -> &'static str {
        match self.copy_feedback {
            Some((feedback, at)) if now.duration_since(at) < COPY_FEEDBACK_DURATION => feedback.label(),
            _ => MessageAction::Copy.label(),
        }
    }

    pub fn has_active_feedback(&self, now: Instant) -> bool {
        self.copy_feedback.is_some_and(|(_, at)| now.duration_since(at) < COPY_FEEDBACK_DURATION)
    }
}

/// The on-screen transcript, driven by the controller through [`Renderer`].
#[derive(Debug, Clone)]
pub struct TranscriptView {
    views: Vec<MessageView>,
    status: Status,
    loading: bool,
}

impl Default for TranscriptView {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptView {
    pub fn new() -> Self {
        Self { views: vec![MessageView::welcome()], status: Status::default(), loading: false }
    }

    pub fn views(&self) -> &[MessageView] {
        &self.views
    }

    pub fn view(&self, position: usize) -> Option<&MessageView> {
        self.views.get(position)
    }

    pub fn view_mut(&mut self, position: usize) -> Option<&mut MessageView> {
        self.views.get_mut(position)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_active_feedback(&self, now: Instant) -> bool {
        self.views.iter().any(|v| v.has_active_feedback(now))
    }
}

impl Renderer for TranscriptView {
    fn on_append(&mut self, index: usize, message: &Message) {
        self.views.push(MessageView::new(Some(index), message.role.into(), message.content.clone()));
    }

    fn on_error(&mut self, text: &str) {
        self.views.push(MessageView::new(None, ViewKind::Error, text));
    }

    fn on_truncate(&mut self, from_index: usize) {
        let cut = match self.views.iter().rposition(|v| v.index.is_some_and(|i| i < from_index)) {
            Some(last_kept) => last_kept + 1,
            None => self.views.iter().take_while(|v| v.kind == ViewKind::Welcome).count(),
        };
        self.views.truncate(cut);
    }

    fn on_clear(&mut self) {
        self.views.retain(|v| v.kind == ViewKind::Welcome);
    }

    fn on_status(&mut self, status: &Status) {
        self.status = status.clone();
    }

    fn on_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}
