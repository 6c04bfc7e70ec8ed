use crate::{state::AppState, theme::ThemePalette};

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use relaychat_controller::{Status, StatusKind};

/// Title bar with the status indicator, provider and display preferences
pub struct Header<'a> {
    state: &'a AppState,
    status: &'a Status,
    theme: ThemePalette,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, status: &'a Status, theme: ThemePalette) -> Self {
        Self { state, status, theme }
    }

    pub fn status_color(&self) -> ratatui::style::Color {
        match self.status.kind {
            StatusKind::Ready => self.theme.green,
            StatusKind::Processing => self.theme.yellow,
            StatusKind::Error => self.theme.red,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let title = Line::from(vec![Span::styled(
            "AI Chat",
            Style::default().fg(self.theme.blue).add_modifier(Modifier::BOLD),
        )]);
        frame.render_widget(Paragraph::new(title), area);

        let mut spans = vec![
            Span::styled("● ", Style::default().fg(self.status_color())),
            Span::styled(self.status.text.clone(), Style::default().fg(self.theme.fg)),
        ];

        if !self.state.provider_name.is_empty() {
            spans.push(Span::styled("  │ ", self.theme.border()));
            spans.push(Span::styled(self.state.provider_name.clone(), Style::default().fg(self.theme.cyan)));
        }

        let preferences = &self.state.preferences;
        spans.push(Span::styled("  │ ", self.theme.border()));
        spans.push(Span::styled(preferences.theme().toggle_label(), self.theme.muted()));
        spans.push(Span::styled("  │ ", self.theme.border()));
        spans.push(Span::styled(
            format!("Text: {}", preferences.font_size().label()),
            self.theme.muted(),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Right), area);
    }
}
