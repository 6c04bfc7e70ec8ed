//! Conversation controller: owns the transcript, drives completion calls and
//! keeps storage and the display in step.

mod busy;
mod confirm;
mod controller;
mod renderer;
pub mod status;

pub use busy::{BusyFlag, BusyGuard};
pub use confirm::{AutoConfirm, AutoDecline, CLEAR_PROMPT, Confirm};
pub use controller::{Controller, FinishOutcome, PendingCompletion, PendingKind};
pub use renderer::{NullRenderer, Renderer};
pub use status::{Status, StatusKind};
