//! Terminal front end for the chat controller.

pub mod app;
pub mod clipboard;
pub mod components;
pub mod event_handler;
pub mod layout;
pub mod state;
pub mod theme;

pub use app::{App, default_export_dir};
pub use clipboard::{ClipboardSink, SystemClipboard};
pub use event_handler::{EventHandler, KeyAction};
pub use state::{AppState, InputState, MessageView, TranscriptView, ViewKind};
pub use theme::{Theme, ThemePalette, ThemeVariant};
