use crate::status::Status;
use relaychat_core::Message;

/// Display surface driven by the controller.
///
/// Views are tagged with transcript indices; error views carry none. The
/// renderer never mutates the transcript, it only mirrors it.
pub trait Renderer {
    /// A transcript entry was appended at `index` (also used for restore).
    fn on_append(&mut self, index: usize, message: &Message);

    /// Show an error view that is not part of the transcript.
    fn on_error(&mut self, text: &str);

    /// Keep views up to the one tagged `from_index - 1`; everything after it,
    /// error views included, is dropped.
    fn on_truncate(&mut self, from_index: usize);

    /// Remove all views except the welcome banner.
    fn on_clear(&mut self);

    fn on_status(&mut self, status: &Status);

    fn on_loading(&mut self, loading: bool);
}

/// Renderer for headless commands; events only reach the log.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn on_append(&mut self, index: usize, message: &Message) {
        tracing::trace!(index, role = %message.role, "append");
    }

    fn on_error(&mut self, text: &str) {
        tracing::debug!(text, "error view");
    }

    fn on_truncate(&mut self, from_index: usize) {
        tracing::trace!(from_index, "truncate");
    }

    fn on_clear(&mut self) {
        tracing::trace!("clear");
    }

    fn on_status(&mut self, status: &Status) {
        tracing::trace!(status = %status.text, "status");
    }

    fn on_loading(&mut self, loading: bool) {
        tracing::trace!(loading, "loading");
    }
}
