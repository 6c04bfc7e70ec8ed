mod event_loop;
mod rendering;

use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::event_handler::{EventHandler, KeyAction};
use crate::state::{AppState, CopyFeedback, TranscriptView};

use crossterm::event::Event;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use relaychat_controller::{AutoConfirm, AutoDecline, Controller, PendingCompletion};
use relaychat_core::CompletionError;
use std::io::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::mpsc;

type CompletionResult = std::result::Result<String, CompletionError>;

/// Main TUI application
///
/// Owns the controller (whose renderer is the on-screen transcript) and the
/// UI state around it. Provider calls run on spawned tasks; their results
/// come back through `completion_rx` and are applied on the event loop.
pub struct App {
    state: AppState,
    controller: Controller<TranscriptView>,
    pending: Option<PendingCompletion>,
    completion_rx: Option<mpsc::Receiver<CompletionResult>>,
    clipboard: Box<dyn ClipboardSink>,
    export_dir: PathBuf,
    pub should_exit: bool,
}

impl App {
    pub fn new(state: AppState, controller: Controller<TranscriptView>) -> Self {
        Self {
            state,
            controller,
            pending: None,
            completion_rx: None,
            clipboard: Box::new(SystemClipboard),
            export_dir: default_export_dir(),
            should_exit: false,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn controller(&self) -> &Controller<TranscriptView> {
        &self.controller
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Replay the saved transcript, then report a missing credential.
    pub fn initialize(&mut self) -> usize {
        let restored = self.controller.restore();
        self.controller.check_configuration();
        restored
    }

    /// Run the TUI until the user quits
    pub async fn run(&mut self) -> Result<()> {
        event_loop::run(self).await
    }

    pub fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        terminal.draw(|frame| self.render(frame))?;
        Ok(())
    }

    pub fn render(&self, frame: &mut Frame<'_>) {
        rendering::render(self, frame, Instant::now());
    }

    pub fn handle_event(&mut self, event: Event) {
        self.state.busy = self.controller.is_busy();
        if let Some(action) = EventHandler::handle_event(&event, &mut self.state, self.controller.renderer()) {
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: KeyAction) {
        tracing::trace!(?action, "key action");

        match action {
            KeyAction::SendMessage { message } => {
                if let Some(pending) = self.controller.begin_send(&message) {
                    self.dispatch(pending);
                }
            }
            KeyAction::CopyMessage { view } => self.copy_view(view),
            KeyAction::RegenerateMessage { index } => {
                if let Some(pending) = self.controller.begin_regenerate(index) {
                    self.dispatch(pending);
                }
            }
            KeyAction::RetryLastMessage => {
                if let Some(pending) = self.controller.begin_retry() {
                    self.dispatch(pending);
                }
            }
            KeyAction::ClearConfirmed => {
                self.controller.clear(&AutoConfirm);
                self.state.focus_input();
            }
            KeyAction::ClearDeclined => {
                self.controller.clear(&AutoDecline);
            }
            KeyAction::InsertTemplate { position } => self.state.insert_template(position),
            KeyAction::ToggleTheme => {
                let theme = self.state.preferences.toggle_theme();
                tracing::debug!(%theme, "theme changed");
            }
            KeyAction::CycleFontSize => {
                let size = self.state.preferences.cycle_font_size();
                tracing::debug!(%size, "font size changed");
            }
            KeyAction::Export => self.export(),
            KeyAction::Exit => self.should_exit = true,
        }

        self.state.busy = self.controller.is_busy();
        self.state.clamp_selection(self.controller.renderer().len());
    }

    fn dispatch(&mut self, pending: PendingCompletion) {
        let (tx, rx) = mpsc::channel(1);
        let provider = self.controller.provider().clone();
        let request = pending.request().clone();

        tokio::spawn(async move {
            let result = provider.complete(request).await;
            let _ = tx.send(result).await;
        });

        self.pending = Some(pending);
        self.completion_rx = Some(rx);
    }

    /// Apply a finished provider call. `None` means the task ended without replying.
    pub fn handle_completion(&mut self, result: Option<CompletionResult>) {
        self.completion_rx = None;
        let Some(pending) = self.pending.take() else {
            return;
        };

        let result = result
            .unwrap_or_else(|| Err(CompletionError::request(None, "Completion task ended without a result")));
        let outcome = self.controller.finish(pending, result);
        tracing::debug!(?outcome, "completion finished");

        self.state.busy = self.controller.is_busy();
        self.state.clamp_selection(self.controller.renderer().len());
    }

    /// Wait for the outstanding call, if any, and apply it.
    pub async fn wait_for_completion(&mut self) {
        if let Some(rx) = self.completion_rx.as_mut() {
            let result = rx.recv().await;
            self.handle_completion(result);
        }
    }

    fn copy_view(&mut self, position: usize) {
        let Some(content) = self.controller.renderer().view(position).map(|v| v.content.clone()) else {
            return;
        };

        let feedback = if self.clipboard.copy(&content) { CopyFeedback::Copied } else { CopyFeedback::Failed };
        if let Some(view) = self.controller.renderer_mut().view_mut(position) {
            view.set_copy_feedback(feedback, Instant::now());
        }
    }

    fn export(&mut self) {
        let artifact = self.controller.export();
        self.state.notice = Some(match artifact.write_to(&self.export_dir) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "transcript exported");
                format!("Exported to {}", path.display())
            }
            Err(e) => {
                tracing::warn!(error = %e, dir = %self.export_dir.display(), "export failed");
                format!("Export failed: {}", e)
            }
        });
    }
}

/// Downloads folder, falling back to home, then the working directory.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().or_else(dirs::home_dir).unwrap_or_else(|| PathBuf::from("."))
}
