/// Actions that can be triggered by key events
///
/// Pure UI changes (cursor movement, selection, opening a modal, loading a
/// message into the input) are applied by the handler directly; these are
/// the ones that need the controller, the clipboard or the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// User wants to send a message
    SendMessage { message: String },
    /// Copy the view at this position in the view list
    CopyMessage { view: usize },
    /// Replace the reply at this transcript index
    RegenerateMessage { index: usize },
    /// Ask again for a trailing user message whose reply failed
    RetryLastMessage,
    /// Clear confirmation answered yes
    ClearConfirmed,
    /// Clear confirmation answered no
    ClearDeclined,
    /// Insert the template at this position
    InsertTemplate { position: usize },
    ToggleTheme,
    CycleFontSize,
    /// Write the transcript report to the export directory
    Export,
    /// Exit the TUI application
    Exit,
}
