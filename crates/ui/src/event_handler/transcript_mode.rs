use crate::state::{AppState, MessageAction, TranscriptView};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::KeyAction;

/// Handle keys while a message is selected
pub fn handle_transcript_key(event: KeyEvent, state: &mut AppState, views: &TranscriptView) -> Option<KeyAction> {
    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return Some(KeyAction::Exit);
    }

    let selected = state.selected?;
    let view = views.view(selected)?;

    match event.code {
        KeyCode::Up | KeyCode::Char('k') => state.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.select_next(views.len()),
        KeyCode::Char('c') if view.supports(MessageAction::Copy) => {
            return Some(KeyAction::CopyMessage { view: selected });
        }
        KeyCode::Char('e') if view.supports(MessageAction::Edit) => {
            state.input.load(&view.content);
            state.focus_input();
        }
        KeyCode::Char('r') if view.supports(MessageAction::Regenerate) => {
            return view.index.map(|index| KeyAction::RegenerateMessage { index });
        }
        KeyCode::Char('t') => return Some(KeyAction::ToggleTheme),
        KeyCode::Char('f') => return Some(KeyAction::CycleFontSize),
        KeyCode::Char('q') => return Some(KeyAction::Exit),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('i') => state.focus_input(),
        _ => {}
    }

    None
}
