use crate::state::{AppState, Modal};
use crossterm::event::{KeyCode, KeyEvent};

use super::KeyAction;

/// Handle keys while a modal is open; every key is consumed.
pub fn handle_modal_key(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let modal = state.modal.clone()?;

    match modal {
        Modal::ConfirmClear => match event.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                state.modal = None;
                Some(KeyAction::ClearConfirmed)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.modal = None;
                Some(KeyAction::ClearDeclined)
            }
            _ => None,
        },
        Modal::Templates { selected } => {
            let last = state.templates.len().saturating_sub(1);
            match event.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    state.modal = Some(Modal::Templates { selected: selected.saturating_sub(1) });
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    state.modal = Some(Modal::Templates { selected: (selected + 1).min(last) });
                }
                KeyCode::Enter => {
                    state.modal = None;
                    return Some(KeyAction::InsertTemplate { position: selected });
                }
                KeyCode::Esc => state.modal = None,
                _ => {}
            }
            None
        }
    }
}
