use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use relaychat_controller::Controller;
use relaychat_core::storage::{self, MemoryStore};
use relaychat_core::{Config, Message, Preferences, Transcript};
use relaychat_providers::{MockProvider, MockResponse, ProviderFactory};
use relaychat_ui::state::Modal;
use relaychat_ui::{App, AppState, TranscriptView};
use std::sync::Arc;

fn create_test_app(history: Vec<Message>, provider: MockProvider) -> App {
    let store = Arc::new(MemoryStore::new());
    storage::save_transcript(store.as_ref(), &Transcript::from_messages(history)).unwrap();

    let controller = Controller::new(Arc::new(provider), store.clone(), TranscriptView::new());
    let templates = vec!["Summarize the following:".to_string(), "Explain this in simple terms:".to_string()];
    let state = AppState::new(Preferences::load(store), templates, 2000).with_provider_name("mock");

    let mut app = App::new(state, controller);
    app.initialize();
    app
}

fn render(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    buffer_to_string(terminal.backend().buffer())
}

fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    app.handle_event(Event::Key(KeyEvent::new(code, modifiers)));
}

#[test]
fn test_render_welcome_and_status() {
    let app = create_test_app(Vec::new(), MockProvider::with_responses(vec![]));
    let content = render(&app, 100, 24);

    assert!(content.contains("AI Chat"));
    assert!(content.contains("● Ready"));
    assert!(content.contains("How can I help you today?"));
    assert!(content.contains("Type your message here..."));
    assert!(content.contains("0/2000"));
    assert!(content.contains("Light Mode"));
    assert!(content.contains("Text: Medium"));
}

#[test]
fn test_render_restored_history_with_controls() {
    let history = vec![Message::user("What is Rust?"), Message::assistant("A systems programming language.")];
    let app = create_test_app(history, MockProvider::with_responses(vec![]));
    let content = render(&app, 100, 24);

    assert!(content.contains("You"));
    assert!(content.contains("What is Rust?"));
    assert!(content.contains("[c] Copy  [e] Edit"));
    assert!(content.contains("A systems programming language."));
    assert!(content.contains("[c] Copy  [r] Regenerate"));
}

#[test]
fn test_render_unconfigured_warning() {
    let app = create_test_app(Vec::new(), MockProvider::unconfigured());
    let content = render(&app, 120, 24);

    assert!(content.contains("API key not configured"));
    assert!(content.contains("Warning: Please configure your API key"));
}

#[test]
fn test_render_empty_relay_endpoint_starts_with_banner() {
    let config = Config::from_toml_str("[provider]\nprovider = \"relay\"\nendpoint = \"\"\n").unwrap();
    let provider = ProviderFactory::create_from_config(&config.provider).unwrap();
    let store = Arc::new(MemoryStore::new());
    let controller = Controller::new(provider, store.clone(), TranscriptView::new());
    let state = AppState::new(Preferences::load(store), Vec::new(), 2000).with_provider_name("relay");

    let mut app = App::new(state, controller);
    app.initialize();
    let content = render(&app, 120, 24);

    assert!(content.contains("API key not configured"));
    assert!(content.contains("Type your message here..."));
}

#[tokio::test]
async fn test_render_loading_then_error() {
    let provider = MockProvider::with_responses(vec![MockResponse::error("Upstream unavailable")]);
    let mut app = create_test_app(Vec::new(), provider);

    for c in "hello".chars() {
        press(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
    }
    assert!(render(&app, 100, 24).contains("5/2000"));

    press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
    let content = render(&app, 100, 24);
    assert!(content.contains("Thinking..."));
    assert!(content.contains("is typing..."));
    assert!(content.contains("waiting for reply"));

    app.wait_for_completion().await;
    let content = render(&app, 120, 24);
    assert!(content.contains("Error occurred"));
    assert!(content.contains("Error: Upstream unavailable. Please check your API configuration."));
    assert_eq!(app.controller().transcript().len(), 1);
}

#[test]
fn test_render_clear_confirmation() {
    let mut app = create_test_app(vec![Message::user("hi")], MockProvider::with_responses(vec![]));
    press(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
    assert_eq!(app.state().modal, Some(Modal::ConfirmClear));

    let content = render(&app, 100, 24);
    assert!(content.contains("Are you sure you want to clear the chat history?"));
    assert!(content.contains("[y] Yes"));

    press(&mut app, KeyCode::Char('y'), KeyModifiers::NONE);
    let content = render(&app, 100, 24);
    assert!(content.contains("Chat cleared"));
    assert!(!content.contains("[e] Edit"));
    assert!(app.controller().transcript().is_empty());
}

#[test]
fn test_render_template_picker_marks_active() {
    let mut app = create_test_app(Vec::new(), MockProvider::with_responses(vec![]));
    press(&mut app, KeyCode::Char('p'), KeyModifiers::CONTROL);
    press(&mut app, KeyCode::Down, KeyModifiers::NONE);
    press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
    assert_eq!(app.state().input.buffer, "Explain this in simple terms:");

    press(&mut app, KeyCode::Char('p'), KeyModifiers::CONTROL);
    let content = render(&app, 100, 24);
    assert!(content.contains("Templates"));
    assert!(content.contains("• Explain this in simple terms:"));
}

#[test]
fn test_render_light_theme_label() {
    let mut app = create_test_app(Vec::new(), MockProvider::with_responses(vec![]));
    press(&mut app, KeyCode::Char('t'), KeyModifiers::CONTROL);
    press(&mut app, KeyCode::Char('f'), KeyModifiers::CONTROL);

    let content = render(&app, 100, 24);
    assert!(content.contains("Dark Mode"));
    assert!(content.contains("Text: Large"));
}

#[test]
fn test_render_compact_width_keeps_counter() {
    let app = create_test_app(Vec::new(), MockProvider::with_responses(vec![]));
    let content = render(&app, 60, 20);
    assert!(content.contains("0/2000"));
    assert!(!content.contains("[Enter]"));
}

fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let mut s = String::new();
    for y in 0..buffer.area().height {
        for x in 0..buffer.area().width {
            s.push(buffer[(x, y)].symbol().chars().next().unwrap_or(' '));
        }
        s.push('\n');
    }
    s
}
