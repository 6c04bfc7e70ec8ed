use crate::busy::{BusyFlag, BusyGuard};
use crate::confirm::{CLEAR_PROMPT, Confirm};
use crate::renderer::Renderer;
use crate::status::{self, Status};

use chrono::{DateTime, Local};
use relaychat_core::logging::{PrivacyConfig, redact_content};
use relaychat_core::storage::{self, KeyValueStore};
use relaychat_core::{CompletionError, ExportArtifact, GenerationConfig, Role, Transcript};
use relaychat_providers::{CompletionRequest, Provider};
use std::sync::Arc;

/// What started an outstanding call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Send,
    Regenerate,
    Retry,
}

/// A completion call that has been started but not finished.
///
/// Holding it keeps the controller busy; dropping it without calling
/// [`Controller::finish`] releases the busy flag but leaves the loading state on.
#[derive(Debug)]
pub struct PendingCompletion {
    request: CompletionRequest,
    kind: PendingKind,
    epoch: u64,
    _guard: BusyGuard,
}

impl PendingCompletion {
    pub fn request(&self) -> &CompletionRequest {
        &self.request
    }

    pub fn kind(&self) -> PendingKind {
        self.kind
    }
}

/// Result of handing a completion back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// Assistant reply appended at this index.
    Appended(usize),
    /// The call failed; the transcript keeps its user-only tail.
    Failed(CompletionError),
    /// The transcript changed underneath the call (clear or regenerate).
    Discarded,
}

/// Owns the transcript and runs the send/regenerate/clear lifecycle.
pub struct Controller<R: Renderer> {
    transcript: Transcript,
    provider: Arc<dyn Provider>,
    store: Arc<dyn KeyValueStore>,
    generation: GenerationConfig,
    renderer: R,
    busy: BusyFlag,
    epoch: u64,
    privacy: PrivacyConfig,
}

impl<R: Renderer> Controller<R> {
    pub fn new(provider: Arc<dyn Provider>, store: Arc<dyn KeyValueStore>, renderer: R) -> Self {
        Self {
            transcript: Transcript::new(),
            provider,
            store,
            generation: GenerationConfig::default(),
            renderer,
            busy: BusyFlag::new(),
            epoch: 0,
            privacy: PrivacyConfig::default(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_privacy(mut self, privacy: PrivacyConfig) -> Self {
        self.privacy = privacy;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Append an entry, render it, and return its index. Blank content is ignored.
    pub fn append(&mut self, role: Role, content: &str) -> Option<usize> {
        let index = self.transcript.append(role, content)?;
        if let Some(message) = self.transcript.get(index) {
            self.renderer.on_append(index, message);
        }
        Some(index)
    }

    /// Report a missing credential once, at startup.
    pub fn check_configuration(&mut self) -> bool {
        if self.provider.is_configured() {
            self.renderer.on_status(&Status::ready(status::READY));
            return true;
        }

        tracing::warn!(provider = self.provider.name(), "provider is not configured");
        self.renderer.on_status(&Status::error(status::KEY_NOT_CONFIGURED));
        self.renderer.on_error(status::CONFIGURATION_WARNING);
        false
    }

    /// Append the user turn and start a call for the whole transcript.
    ///
    /// Returns `None` without touching the transcript when a call is already
    /// outstanding or the text is blank.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingCompletion> {
        let Some(guard) = self.busy.try_acquire() else {
            tracing::debug!("send rejected: a completion is already in flight");
            return None;
        };

        let content = text.trim();
        let index = self.append(Role::User, content)?;
        tracing::info!(index, content = %redact_content(content, &self.privacy), "user message");

        Some(self.start(PendingKind::Send, guard))
    }

    /// Replace the reply at `assistant_index` and everything after it.
    ///
    /// No-op unless `assistant_index` is an assistant entry with a user entry
    /// somewhere before it.
    pub fn begin_regenerate(&mut self, assistant_index: usize) -> Option<PendingCompletion> {
        if !self.transcript.get(assistant_index).is_some_and(|m| m.is_assistant()) {
            tracing::debug!(assistant_index, "regenerate ignored: not an assistant entry");
            return None;
        }

        let Some(user_index) = self.transcript.nearest_user_before(assistant_index) else {
            tracing::debug!(assistant_index, "regenerate ignored: no preceding user entry");
            return None;
        };

        let Some(guard) = self.busy.try_acquire() else {
            tracing::debug!("regenerate rejected: a completion is already in flight");
            return None;
        };

        let keep = user_index + 1;
        tracing::info!(assistant_index, user_index, dropped = self.transcript.len() - keep, "regenerating");
        self.transcript.truncate(keep);
        self.epoch += 1;
        self.renderer.on_truncate(keep);

        Some(self.start(PendingKind::Regenerate, guard))
    }

    /// Re-request a reply for a trailing user turn whose call failed.
    pub fn begin_retry(&mut self) -> Option<PendingCompletion> {
        if !self.transcript.awaiting_reply() {
            return None;
        }

        let guard = self.busy.try_acquire()?;
        tracing::info!(turns = self.transcript.len(), "retrying unanswered turn");
        Some(self.start(PendingKind::Retry, guard))
    }

    fn start(&mut self, kind: PendingKind, guard: BusyGuard) -> PendingCompletion {
        self.renderer.on_loading(true);
        self.renderer.on_status(&Status::processing(status::THINKING));

        let request = CompletionRequest::new(self.transcript.entries().to_vec(), self.generation);
        PendingCompletion { request, kind, epoch: self.epoch, _guard: guard }
    }

    /// Apply the outcome of a call started by one of the `begin_*` methods.
    pub fn finish(&mut self, pending: PendingCompletion, result: Result<String, CompletionError>) -> FinishOutcome {
        self.renderer.on_loading(false);

        if pending.epoch != self.epoch {
            tracing::debug!(kind = ?pending.kind, "discarding completion for a transcript that has since changed");
            return FinishOutcome::Discarded;
        }

        let outcome = match result {
            Ok(text) => match self.append(Role::Assistant, &text) {
                Some(index) => {
                    tracing::info!(index, content = %redact_content(&text, &self.privacy), "assistant reply");
                    self.renderer.on_status(&Status::ready(status::READY));
                    FinishOutcome::Appended(index)
                }
                None => self.fail(CompletionError::EmptyResponse),
            },
            Err(err) => self.fail(err),
        };

        self.persist();
        outcome
    }

    fn fail(&mut self, err: CompletionError) -> FinishOutcome {
        tracing::warn!(error = %err, "completion failed");

        let status = if err.is_configuration() { status::KEY_NOT_CONFIGURED } else { status::ERROR_OCCURRED };
        self.renderer.on_error(&status::error_view_text(&err.to_string()));
        self.renderer.on_status(&Status::error(status));

        FinishOutcome::Failed(err)
    }

    /// `begin_send` + provider call + `finish`.
    pub async fn send(&mut self, text: &str) -> Option<FinishOutcome> {
        let pending = self.begin_send(text)?;
        Some(self.run(pending).await)
    }

    /// `begin_regenerate` + provider call + `finish`.
    pub async fn regenerate(&mut self, assistant_index: usize) -> Option<FinishOutcome> {
        let pending = self.begin_regenerate(assistant_index)?;
        Some(self.run(pending).await)
    }

    /// `begin_retry` + provider call + `finish`.
    pub async fn retry(&mut self) -> Option<FinishOutcome> {
        let pending = self.begin_retry()?;
        Some(self.run(pending).await)
    }

    async fn run(&mut self, pending: PendingCompletion) -> FinishOutcome {
        let result = self.provider.complete(pending.request().clone()).await;
        self.finish(pending, result)
    }

    /// Empty the transcript after confirmation. Returns whether it was cleared.
    pub fn clear(&mut self, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(CLEAR_PROMPT) {
            tracing::debug!("clear declined");
            return false;
        }

        tracing::info!(turns = self.transcript.len(), "clearing transcript");
        self.transcript.clear();
        self.epoch += 1;
        self.renderer.on_clear();
        self.persist();
        self.renderer.on_status(&Status::ready(status::CHAT_CLEARED));
        true
    }

    /// Text report of the transcript as of now.
    pub fn export(&self) -> ExportArtifact {
        self.export_at(Local::now())
    }

    pub fn export_at(&self, now: DateTime<Local>) -> ExportArtifact {
        ExportArtifact::new(self.transcript.entries(), now)
    }

    /// Save the transcript. Failures are logged and reported as `false`.
    pub fn persist(&self) -> bool {
        match storage::save_transcript(self.store.as_ref(), &self.transcript) {
            Ok(()) => {
                tracing::debug!(turns = self.transcript.len(), "transcript saved");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save transcript");
                false
            }
        }
    }

    /// Load the saved transcript and replay it into the renderer.
    ///
    /// Unreadable or corrupt data starts an empty transcript.
    pub fn restore(&mut self) -> usize {
        let transcript = match storage::load_transcript(self.store.as_ref()) {
            Ok(transcript) => transcript,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load saved transcript, starting empty");
                Transcript::new()
            }
        };

        self.transcript = transcript;
        for (index, message) in self.transcript.entries().iter().enumerate() {
            self.renderer.on_append(index, message);
        }

        tracing::info!(turns = self.transcript.len(), "transcript restored");
        self.transcript.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AutoConfirm, AutoDecline};
    use crate::status::StatusKind;
    use chrono::TimeZone;
    use relaychat_core::storage::{CONVERSATION_KEY, MemoryStore};
    use relaychat_core::{Message, StorageError};
    use relaychat_providers::{MockProvider, MockResponse};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Append(usize, Message),
        Error(String),
        Truncate(usize),
        Clear,
        Status(Status),
        Loading(bool),
    }

    /// Keeps a view list the way a display would, plus the raw event log.
    #[derive(Debug, Default)]
    struct RecordingRenderer {
        events: Vec<Event>,
        views: Vec<(Option<usize>, String)>,
    }

    impl RecordingRenderer {
        fn errors(&self) -> Vec<&str> {
            self.views.iter().filter(|(i, _)| i.is_none()).map(|(_, t)| t.as_str()).collect()
        }

        fn last_status(&self) -> Option<&Status> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Status(s) => Some(s),
                _ => None,
            })
        }
    }

    impl Renderer for RecordingRenderer {
        fn on_append(&mut self, index: usize, message: &Message) {
            self.events.push(Event::Append(index, message.clone()));
            self.views.push((Some(index), message.content.clone()));
        }

        fn on_error(&mut self, text: &str) {
            self.events.push(Event::Error(text.to_string()));
            self.views.push((None, text.to_string()));
        }

        fn on_truncate(&mut self, from_index: usize) {
            self.events.push(Event::Truncate(from_index));
            let cut = self.views.iter().rposition(|(i, _)| i.is_some_and(|i| i < from_index)).map_or(0, |p| p + 1);
            self.views.truncate(cut);
        }

        fn on_clear(&mut self) {
            self.events.push(Event::Clear);
            self.views.clear();
        }

        fn on_status(&mut self, status: &Status) {
            self.events.push(Event::Status(status.clone()));
        }

        fn on_loading(&mut self, loading: bool) {
            self.events.push(Event::Loading(loading));
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::read(key, "unavailable"))
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::write(key, "unavailable"))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::write(key, "unavailable"))
        }
    }

    fn controller_with(
        responses: Vec<MockResponse>,
    ) -> (Controller<RecordingRenderer>, Arc<MockProvider>, Arc<MemoryStore>) {
        let provider = Arc::new(MockProvider::with_responses(responses));
        let store = Arc::new(MemoryStore::new());
        let controller = Controller::new(provider.clone(), store.clone(), RecordingRenderer::default());
        (controller, provider, store)
    }

    fn saved(store: &MemoryStore) -> Vec<Message> {
        let raw = store.get(CONVERSATION_KEY).unwrap().unwrap_or_else(|| "[]".to_string());
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_append_grows_by_one_and_ignores_blank() {
        let (mut controller, _, _) = controller_with(vec![]);

        assert_eq!(controller.append(Role::User, "hi"), Some(0));
        assert_eq!(controller.append(Role::Assistant, "hello"), Some(1));
        assert_eq!(controller.append(Role::User, "   "), None);
        assert_eq!(controller.append(Role::User, ""), None);

        assert_eq!(controller.transcript().len(), 2);
        assert_eq!(controller.renderer().views.len(), 2);
    }

    #[tokio::test]
    async fn test_send_success_appends_reply_and_persists() {
        let (mut controller, provider, store) = controller_with(vec![MockResponse::text("hello!")]);

        let outcome = controller.send("  hi  ").await;
        assert_eq!(outcome, Some(FinishOutcome::Appended(1)));

        assert_eq!(controller.transcript().entries(), &[Message::user("hi"), Message::assistant("hello!")]);
        assert_eq!(saved(&store), vec![Message::user("hi"), Message::assistant("hello!")]);
        assert_eq!(controller.renderer().last_status(), Some(&Status::ready("Ready")));
        assert!(!controller.is_busy());

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages, vec![Message::user("hi")]);
        assert_eq!(requests[0].generation, GenerationConfig::default());
    }

    #[tokio::test]
    async fn test_send_event_order() {
        let (mut controller, _, _) = controller_with(vec![MockResponse::text("ok")]);
        controller.send("hi").await;

        assert_eq!(
            controller.renderer().events,
            vec![
                Event::Append(0, Message::user("hi")),
                Event::Loading(true),
                Event::Status(Status::processing("Thinking...")),
                Event::Loading(false),
                Event::Append(1, Message::assistant("ok")),
                Event::Status(Status::ready("Ready")),
            ]
        );
    }

    #[tokio::test]
    async fn test_send_failure_keeps_user_turn_and_shows_error() {
        let (mut controller, _, store) = controller_with(vec![MockResponse::error("Bad gateway")]);

        let outcome = controller.send("hi").await;
        assert!(matches!(outcome, Some(FinishOutcome::Failed(CompletionError::Request { .. }))));

        assert_eq!(controller.transcript().entries(), &[Message::user("hi")]);
        assert_eq!(
            controller.renderer().errors(),
            vec!["Error: Bad gateway. Please check your API configuration."]
        );
        assert_eq!(controller.renderer().last_status(), Some(&Status::error("Error occurred")));
        assert_eq!(saved(&store), vec![Message::user("hi")]);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_configuration_error_sets_key_status() {
        let (mut controller, _, _) =
            controller_with(vec![MockResponse::Unconfigured { message: "Server API key is not configured.".into() }]);

        controller.send("hi").await;
        let status = controller.renderer().last_status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "API key not configured");
    }

    #[tokio::test]
    async fn test_empty_response_is_an_error() {
        let (mut controller, _, _) = controller_with(vec![MockResponse::Empty]);

        let outcome = controller.send("hi").await;
        assert_eq!(outcome, Some(FinishOutcome::Failed(CompletionError::EmptyResponse)));
        assert_eq!(controller.transcript().len(), 1);
    }

    #[test]
    fn test_send_rejected_while_busy() {
        let (mut controller, _, _) = controller_with(vec![]);

        let pending = controller.begin_send("first").unwrap();
        assert!(controller.is_busy());
        assert!(controller.begin_send("second").is_none());
        assert_eq!(controller.transcript().len(), 1);

        controller.finish(pending, Ok("reply".to_string()));
        assert!(!controller.is_busy());
        assert!(controller.begin_send("second").is_some());
    }

    #[test]
    fn test_blank_send_does_nothing() {
        let (mut controller, _, _) = controller_with(vec![]);
        assert!(controller.begin_send("  \n ").is_none());
        assert!(controller.transcript().is_empty());
        assert!(controller.renderer().events.is_empty());
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_dropping_pending_releases_busy() {
        let (mut controller, _, _) = controller_with(vec![]);
        let pending = controller.begin_send("hi").unwrap();
        drop(pending);
        assert!(!controller.is_busy());
    }

    fn seeded(responses: Vec<MockResponse>) -> (Controller<RecordingRenderer>, Arc<MockProvider>, Arc<MemoryStore>) {
        let (mut controller, provider, store) = controller_with(responses);
        controller.append(Role::User, "q1");
        controller.append(Role::Assistant, "a1");
        controller.append(Role::User, "q2");
        controller.append(Role::Assistant, "a2");
        (controller, provider, store)
    }

    #[tokio::test]
    async fn test_regenerate_non_assistant_is_noop() {
        let (mut controller, provider, _) = seeded(vec![MockResponse::text("new")]);
        let before_events = controller.renderer().events.len();

        assert_eq!(controller.regenerate(2).await, None);
        assert_eq!(controller.regenerate(99).await, None);

        assert_eq!(controller.transcript().len(), 4);
        assert_eq!(controller.renderer().views.len(), 4);
        assert_eq!(controller.renderer().events.len(), before_events);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_regenerate_without_user_before_is_noop() {
        let (mut controller, provider, _) = controller_with(vec![MockResponse::text("new")]);
        controller.append(Role::Assistant, "orphan");

        assert_eq!(controller.regenerate(0).await, None);
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_regenerate_truncates_and_appends() {
        let (mut controller, provider, store) = seeded(vec![MockResponse::text("a1 again")]);

        let outcome = controller.regenerate(1).await;
        assert_eq!(outcome, Some(FinishOutcome::Appended(1)));

        assert_eq!(controller.transcript().entries(), &[Message::user("q1"), Message::assistant("a1 again")]);
        assert_eq!(provider.requests()[0].messages, vec![Message::user("q1")]);
        assert!(controller.renderer().events.contains(&Event::Truncate(1)));
        assert_eq!(
            controller.renderer().views,
            vec![(Some(0), "q1".to_string()), (Some(1), "a1 again".to_string())]
        );
        assert_eq!(saved(&store).len(), 2);
    }

    #[tokio::test]
    async fn test_regenerate_last_reply() {
        let (mut controller, _, _) = seeded(vec![MockResponse::text("a2 again")]);

        assert_eq!(controller.regenerate(3).await, Some(FinishOutcome::Appended(3)));
        assert_eq!(controller.transcript().get(3), Some(&Message::assistant("a2 again")));
        assert_eq!(controller.transcript().len(), 4);
    }

    #[tokio::test]
    async fn test_regenerate_failure_leaves_truncated_transcript() {
        let (mut controller, _, _) = seeded(vec![MockResponse::error("timeout")]);

        let outcome = controller.regenerate(3).await;
        assert!(matches!(outcome, Some(FinishOutcome::Failed(_))));
        assert_eq!(controller.transcript().len(), 3);
        assert!(controller.transcript().awaiting_reply());
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let (mut controller, provider, _) =
            controller_with(vec![MockResponse::error("flaky"), MockResponse::text("second try")]);

        controller.send("hi").await;
        assert_eq!(controller.retry().await, Some(FinishOutcome::Appended(1)));
        assert_eq!(controller.transcript().entries(), &[Message::user("hi"), Message::assistant("second try")]);
        assert_eq!(provider.requests()[1].messages, vec![Message::user("hi")]);
    }

    #[tokio::test]
    async fn test_regenerate_after_retry_drops_stale_error_view() {
        let (mut controller, _, _) = controller_with(vec![
            MockResponse::text("a1"),
            MockResponse::error("boom"),
            MockResponse::text("a3"),
            MockResponse::text("a3 again"),
        ]);

        controller.send("q0").await;
        controller.send("q2").await;
        assert_eq!(controller.retry().await, Some(FinishOutcome::Appended(3)));
        assert_eq!(controller.regenerate(3).await, Some(FinishOutcome::Appended(3)));

        assert_eq!(
            controller.renderer().views,
            vec![
                (Some(0), "q0".to_string()),
                (Some(1), "a1".to_string()),
                (Some(2), "q2".to_string()),
                (Some(3), "a3 again".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_retry_noop_when_answered() {
        let (mut controller, provider, _) = seeded(vec![]);
        assert_eq!(controller.retry().await, None);
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let (mut controller, _, store) = seeded(vec![]);
        controller.persist();

        assert!(!controller.clear(&AutoDecline));
        assert_eq!(controller.transcript().len(), 4);
        assert_eq!(controller.renderer().views.len(), 4);
        assert_eq!(saved(&store).len(), 4);

        assert!(controller.clear(&AutoConfirm));
        assert!(controller.transcript().is_empty());
        assert!(controller.renderer().views.is_empty());
        assert!(saved(&store).is_empty());
        assert_eq!(controller.renderer().last_status(), Some(&Status::ready("Chat cleared")));
    }

    #[test]
    fn test_clear_with_closure_sees_prompt() {
        let (mut controller, _, _) = seeded(vec![]);
        let asked = std::cell::RefCell::new(String::new());
        let confirm = |prompt: &str| {
            asked.replace(prompt.to_string());
            false
        };

        assert!(!controller.clear(&confirm));
        assert_eq!(asked.into_inner(), "Are you sure you want to clear the chat history?");
    }

    #[test]
    fn test_result_after_clear_is_discarded() {
        let (mut controller, _, store) = controller_with(vec![]);

        let pending = controller.begin_send("hi").unwrap();
        controller.clear(&AutoConfirm);

        assert_eq!(controller.finish(pending, Ok("late".to_string())), FinishOutcome::Discarded);
        assert!(controller.transcript().is_empty());
        assert!(saved(&store).is_empty());
        assert_eq!(controller.renderer().events.last(), Some(&Event::Loading(false)));
    }

    #[test]
    fn test_export_does_not_mutate() {
        let (controller, _, _) = seeded(vec![]);
        let now = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        let artifact = controller.export_at(now);
        assert_eq!(artifact.file_name, "chat-export-2025-01-02.txt");
        assert!(artifact.contents.contains("[1] You:\nq1"));
        assert!(artifact.contents.contains("[4] AI Assistant:\na2"));
        assert_eq!(controller.transcript().len(), 4);
    }

    #[test]
    fn test_export_empty() {
        let (controller, _, _) = controller_with(vec![]);
        let artifact = controller.export();
        assert!(artifact.contents.contains("No conversation history to export."));
        assert!(!artifact.contents.contains("You:"));
    }

    #[test]
    fn test_persist_then_restore_roundtrip() {
        let (controller, provider, store) = seeded(vec![]);
        assert!(controller.persist());

        let mut fresh = Controller::new(provider, store, RecordingRenderer::default());
        assert_eq!(fresh.restore(), 4);
        assert_eq!(fresh.transcript(), controller.transcript());
        assert_eq!(
            fresh.renderer().events,
            vec![
                Event::Append(0, Message::user("q1")),
                Event::Append(1, Message::assistant("a1")),
                Event::Append(2, Message::user("q2")),
                Event::Append(3, Message::assistant("a2")),
            ]
        );
    }

    #[test]
    fn test_restore_corrupt_data_starts_empty() {
        let (mut controller, _, store) = controller_with(vec![]);
        store.set(CONVERSATION_KEY, "not json at all").unwrap();

        assert_eq!(controller.restore(), 0);
        assert!(controller.transcript().is_empty());
        assert!(controller.renderer().views.is_empty());
    }

    #[tokio::test]
    async fn test_storage_failures_are_not_fatal() {
        let provider = Arc::new(MockProvider::with_responses(vec![MockResponse::text("fine")]));
        let mut controller = Controller::new(provider, Arc::new(FailingStore), RecordingRenderer::default());

        assert_eq!(controller.restore(), 0);
        assert_eq!(controller.send("hi").await, Some(FinishOutcome::Appended(1)));
        assert!(!controller.persist());
        assert_eq!(controller.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_quota_exceeded_keeps_memory_state() {
        let provider = Arc::new(MockProvider::with_responses(vec![MockResponse::text("x".repeat(64))]));
        let store = Arc::new(MemoryStore::with_quota(40));
        let mut controller = Controller::new(provider, store.clone(), RecordingRenderer::default());

        controller.send("hi").await;
        assert_eq!(controller.transcript().len(), 2);
        assert_eq!(store.get(CONVERSATION_KEY).unwrap(), None);
    }

    #[test]
    fn test_check_configuration() {
        let (mut controller, _, _) = controller_with(vec![]);
        assert!(controller.check_configuration());
        assert_eq!(controller.renderer().last_status(), Some(&Status::ready("Ready")));

        let mut controller = Controller::new(
            Arc::new(MockProvider::unconfigured()),
            Arc::new(MemoryStore::new()),
            RecordingRenderer::default(),
        );
        assert!(!controller.check_configuration());
        assert_eq!(controller.renderer().last_status(), Some(&Status::error("API key not configured")));
        assert_eq!(controller.renderer().errors(), vec![status::CONFIGURATION_WARNING]);
        assert!(controller.transcript().is_empty());
    }

    #[test]
    fn test_generation_config_is_forwarded() {
        let (controller, _, _) = controller_with(vec![]);
        let generation = GenerationConfig { temperature: 0.2, max_output_tokens: 64 };
        let mut controller = controller.with_generation(generation);

        let pending = controller.begin_send("hi").unwrap();
        assert_eq!(pending.request().generation, generation);
        assert_eq!(pending.kind(), PendingKind::Send);
    }

    #[test]
    fn test_split_phase_send_outside_runtime() {
        let (mut controller, provider, _) = controller_with(vec![MockResponse::text("later")]);

        let pending = controller.begin_send("hi").unwrap();
        assert!(controller.is_busy());
        assert!(controller.begin_send("again").is_none());

        let result = tokio_test::block_on(provider.complete(pending.request().clone()));
        assert_eq!(controller.finish(pending, result), FinishOutcome::Appended(1));
        assert!(!controller.is_busy());
    }
}
