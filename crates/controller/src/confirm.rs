/// Question asked before the transcript is cleared.
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the chat history?";

/// Yes/no gate for destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Always answers yes (`--yes`, or a prompt already answered in the UI).
#[derive(Debug, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Always answers no.
#[derive(Debug, Default)]
pub struct AutoDecline;

impl Confirm for AutoDecline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
