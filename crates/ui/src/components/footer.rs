use crate::layout::{LayoutMode, TuiLayout};
use crate::state::{AppState, Focus};
use crate::theme::ThemePalette;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const PLACEHOLDER: &str = "Type your message here...";
const CURSOR: char = '█';

/// Footer component: input box, character counter and key hints
pub struct Footer<'a> {
    state: &'a AppState,
    theme: ThemePalette,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a AppState, theme: ThemePalette) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame<'_>, layout: &TuiLayout) {
        self.render_input(frame, layout.input);

        let (hints_area, counter_area) = layout.hint_sections();
        if layout.mode == LayoutMode::Full {
            self.render_hints(frame, hints_area);
        }
        self.render_counter(frame, counter_area);
    }

    fn render_input(&self, frame: &mut Frame<'_>, area: Rect) {
        let focused = self.state.focus == Focus::Input && self.state.modal.is_none();
        let border = if focused { Style::default().fg(self.theme.blue) } else { self.theme.border() };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .style(self.theme.panel());

        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let input = &self.state.input;
        if input.is_empty() {
            let mut spans = Vec::new();
            if focused {
                spans.push(Span::styled(CURSOR.to_string(), Style::default().fg(self.theme.fg)));
            }
            spans.push(Span::styled(PLACEHOLDER, self.theme.muted()));
            frame.render_widget(Paragraph::new(Line::from(spans)), inner);
            return;
        }

        let mut text = input.buffer.clone();
        if focused {
            let at = text.char_indices().nth(input.cursor).map(|(i, _)| i).unwrap_or(text.len());
            text.insert(at, CURSOR);
        }

        let width = inner.width as usize;
        let lines: Vec<Line> = text
            .split('\n')
            .flat_map(|raw| {
                textwrap::wrap(raw, width)
                    .into_iter()
                    .map(|w| Line::from(Span::styled(w.into_owned(), Style::default().fg(self.theme.fg))))
                    .collect::<Vec<_>>()
            })
            .collect();

        let offset = lines.len().saturating_sub(inner.height as usize);
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
    }

    fn render_counter(&self, frame: &mut Frame<'_>, area: Rect) {
        let style = if self.state.input.overflowed() { self.theme.error() } else { self.theme.muted() };
        let counter = Paragraph::new(Line::from(Span::styled(self.state.input.counter_text(), style)))
            .alignment(Alignment::Right);
        frame.render_widget(counter, area);
    }

    fn render_hints(&self, frame: &mut Frame<'_>, area: Rect) {
        let line = match &self.state.notice {
            Some(notice) => Line::from(Span::styled(notice.clone(), Style::default().fg(self.theme.cyan))),
            None => Line::from(self.hint_spans()),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn hint_spans(&self) -> Vec<Span<'static>> {
        let key = Style::default().fg(self.theme.blue);
        let label = self.theme.muted();

        let mut spans = Vec::new();
        if self.state.focus == Focus::Input {
            let (send_key, send_label) = if self.state.busy { (label, " waiting for reply  ") } else { (key, " send  ") };
            spans.push(Span::styled("[Enter]", send_key));
            spans.push(Span::styled(send_label, label));
        }

        let hints: &[(&str, &str)] = match self.state.focus {
            Focus::Input => &[
                ("Alt+Enter", "newline"),
                ("Esc", "messages"),
                ("^P", "templates"),
                ("^T", "theme"),
                ("^F", "size"),
                ("^E", "export"),
                ("^L", "clear"),
                ("^C", "quit"),
            ],
            Focus::Transcript => &[
                ("↑↓", "select"),
                ("c", "copy"),
                ("e", "edit"),
                ("r", "regenerate"),
                ("Esc", "input"),
                ("q", "quit"),
            ],
        };

        for (k, text) in hints {
            spans.push(Span::styled(format!("[{}]", k), key));
            spans.push(Span::styled(format!(" {}  ", text), label));
        }
        spans
    }
}
