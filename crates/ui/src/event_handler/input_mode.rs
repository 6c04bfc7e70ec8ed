use crate::state::{AppState, Modal, TranscriptView};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::KeyAction;

/// Handle keys while the input box has focus
pub fn handle_input_key(event: KeyEvent, state: &mut AppState, views: &TranscriptView) -> Option<KeyAction> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);

    if ctrl {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(KeyAction::Exit),
            KeyCode::Char('t') => Some(KeyAction::ToggleTheme),
            KeyCode::Char('f') => Some(KeyAction::CycleFontSize),
            KeyCode::Char('e') => Some(KeyAction::Export),
            KeyCode::Char('r') => Some(KeyAction::RetryLastMessage),
            KeyCode::Char('l') => {
                state.modal = Some(Modal::ConfirmClear);
                None
            }
            KeyCode::Char('p') => {
                state.open_templates();
                None
            }
            KeyCode::Char('j') => {
                state.input.newline();
                None
            }
            _ => None,
        };
    }

    match event.code {
        KeyCode::Enter if alt || event.modifiers.contains(KeyModifiers::SHIFT) => state.input.newline(),
        KeyCode::Enter => {
            if state.busy || state.input.buffer.trim().is_empty() {
                return None;
            }
            let message = state.input.take();
            return Some(KeyAction::SendMessage { message });
        }
        KeyCode::Esc => state.focus_transcript(views.len()),
        KeyCode::Up if state.input.is_empty() => state.focus_transcript(views.len()),
        KeyCode::Backspace => state.input.backspace(),
        KeyCode::Delete => state.input.delete(),
        KeyCode::Left => state.input.move_left(),
        KeyCode::Right => state.input.move_right(),
        KeyCode::Home => state.input.move_home(),
        KeyCode::End => state.input.move_end(),
        KeyCode::Char(c) if !alt => state.input.insert_char(c),
        _ => {}
    }

    None
}
