mod input_mode;
mod key_action;
mod modal;
mod transcript_mode;

pub use key_action::KeyAction;

use crate::state::{AppState, Focus, TranscriptView};

use crossterm::event::{Event, KeyEvent, KeyEventKind};

use self::{input_mode::handle_input_key, modal::handle_modal_key, transcript_mode::handle_transcript_key};

/// Event handler for the TUI application
pub struct EventHandler;

impl EventHandler {
    /// Read a single event from the terminal
    ///
    /// Returns `Some(event)` if an event is available, `None` on timeout or error.
    pub fn read() -> Option<Event> {
        match crossterm::event::poll(std::time::Duration::from_millis(100)) {
            Ok(true) => match crossterm::event::read() {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!(error = %e, "terminal read error");
                    None
                }
            },
            Ok(false) => None,
            Err(e) => {
                tracing::warn!(error = %e, "event poll error");
                None
            }
        }
    }

    /// Handle a keyboard event
    pub fn handle_key_event(event: KeyEvent, state: &mut AppState, views: &TranscriptView) -> Option<KeyAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        state.notice = None;

        if state.modal.is_some() {
            return handle_modal_key(event, state);
        }

        match state.focus {
            Focus::Input => handle_input_key(event, state, views),
            Focus::Transcript => handle_transcript_key(event, state, views),
        }
    }

    /// Handle any terminal event
    pub fn handle_event(event: &Event, state: &mut AppState, views: &TranscriptView) -> Option<KeyAction> {
        match event {
            Event::Key(key_event) => Self::handle_key_event(*key_event, state, views),
            Event::Paste(text) if state.focus == Focus::Input && state.modal.is_none() => {
                state.input.insert_str(text);
                None
            }
            _ => None,
        }
    }
}
