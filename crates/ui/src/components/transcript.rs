use crate::state::{AppState, MessageAction, MessageView, TranscriptView, ViewKind};
use crate::theme::ThemePalette;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use relaychat_core::FontSize;
use std::time::Instant;

const CONTENT_INDENT: &str = "  ";

/// Blank lines between messages; the terminal stand-in for text size.
pub fn message_spacing(font_size: FontSize) -> usize {
    match font_size {
        FontSize::Small => 0,
        FontSize::Medium => 1,
        FontSize::Large => 2,
    }
}

/// Message list with per-message controls
///
/// Follows the newest message unless one is selected, in which case the
/// selection is kept on screen.
pub struct Transcript<'a> {
    view: &'a TranscriptView,
    state: &'a AppState,
    theme: ThemePalette,
    now: Instant,
}

impl<'a> Transcript<'a> {
    pub fn new(view: &'a TranscriptView, state: &'a AppState, theme: ThemePalette, now: Instant) -> Self {
        Self { view, state, theme, now }
    }

    fn accent(&self, kind: ViewKind) -> Color {
        match kind {
            ViewKind::User => self.theme.blue,
            ViewKind::Assistant | ViewKind::Welcome => self.theme.purple,
            ViewKind::Error => self.theme.red,
        }
    }

    fn header_line(&self, message: &MessageView, selected: bool) -> Line<'static> {
        let accent = self.accent(message.kind);
        let mut spans = vec![
            Span::styled(message.kind.label().to_string(), Style::default().fg(accent).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", message.format_time()), self.theme.muted()),
        ];

        let control = if selected { Style::default().fg(self.theme.blue) } else { self.theme.muted() };
        for action in message.actions() {
            let label = match action {
                MessageAction::Copy => message.copy_label(self.now),
                other => other.label(),
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(format!("[{}] {}", action.key(), label), control));
        }

        Line::from(spans)
    }

    /// All lines plus the `(start, end)` line range of each view.
    fn build_lines(&self, width: usize) -> (Vec<Line<'static>>, Vec<(usize, usize)>) {
        let spacing = message_spacing(self.state.preferences.font_size());
        let wrap_width = width.saturating_sub(CONTENT_INDENT.len()).max(1);

        let mut lines = Vec::new();
        let mut ranges = Vec::with_capacity(self.view.len());

        for (position, message) in self.view.views().iter().enumerate() {
            if position > 0 {
                lines.extend(std::iter::repeat_n(Line::default(), spacing));
            }

            let selected = self.state.selected == Some(position);
            let start = lines.len();
            lines.push(self.header_line(message, selected));

            let body = match message.kind {
                ViewKind::Error => self.theme.error(),
                _ => Style::default().fg(self.theme.fg),
            };
            for raw in message.content.split('\n') {
                for wrapped in textwrap::wrap(raw, wrap_width) {
                    lines.push(Line::from(vec![
                        Span::raw(CONTENT_INDENT),
                        Span::styled(wrapped.into_owned(), body),
                    ]));
                }
            }

            if selected {
                for line in &mut lines[start..] {
                    *line = std::mem::take(line).style(self.theme.active());
                }
            }
            ranges.push((start, lines.len()));
        }

        if self.view.is_loading() {
            lines.extend(std::iter::repeat_n(Line::default(), spacing));
            lines.push(Line::from(Span::styled(
                format!("{} is typing...", ViewKind::Assistant.label()),
                self.theme.muted().add_modifier(Modifier::ITALIC),
            )));
        }

        (lines, ranges)
    }

    /// First line to show so the selection (or the tail) is visible.
    fn scroll_offset(&self, total: usize, height: usize, ranges: &[(usize, usize)]) -> usize {
        let bottom = total.saturating_sub(height);
        match self.state.selected.and_then(|s| ranges.get(s)) {
            Some(&(start, end)) => {
                if end.saturating_sub(start) >= height {
                    start
                } else {
                    bottom.min(start).max(end.saturating_sub(height))
                }
            }
            None => bottom,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let (lines, ranges) = self.build_lines(area.width as usize);
        let offset = self.scroll_offset(lines.len(), area.height as usize, &ranges);
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);

        frame.render_widget(Paragraph::new(lines).style(self.theme.base()).scroll((offset, 0)), area);
    }
}
