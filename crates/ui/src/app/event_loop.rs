use super::App;
use crate::event_handler::EventHandler;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Result;
use std::{panic, time::Duration};

pub async fn run(app: &mut App) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let backend = CrosstermBackend::new(std::io::stdout());
        if let Ok(mut terminal) = Terminal::new(backend) {
            let _ = terminal.show_cursor();
        }
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            DisableBracketedPaste,
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    terminal.clear()?;
    terminal.hide_cursor()?;
    app.draw(&mut terminal)?;

    while !app.should_exit {
        let tui_poll = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            EventHandler::read()
        };

        tokio::select! {
            maybe_event = tui_poll => {
                if let Some(event) = maybe_event {
                    app.handle_event(event);
                }
                // also redraws expiring copy feedback
                app.draw(&mut terminal)?;
            }
            result = async {
                if let Some(ref mut rx) = app.completion_rx {
                    rx.recv().await
                } else {
                    std::future::pending().await
                }
            } => {
                app.handle_completion(result);
                app.draw(&mut terminal)?;
            }
        }
    }

    if app.pending.is_some() {
        tracing::info!("exiting with a completion still outstanding");
    }

    terminal.show_cursor()?;
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), DisableBracketedPaste, crossterm::terminal::LeaveAlternateScreen)?;

    Ok(())
}
