use crate::layout::centered_rect;
use crate::state::{AppState, Modal};
use crate::theme::ThemePalette;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use relaychat_controller::CLEAR_PROMPT;

/// Overlay for the clear confirmation and the template picker
pub struct ModalView<'a> {
    state: &'a AppState,
    theme: ThemePalette,
}

impl<'a> ModalView<'a> {
    pub fn new(state: &'a AppState, theme: ThemePalette) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        match &self.state.modal {
            Some(Modal::ConfirmClear) => self.render_confirm(frame, area),
            Some(Modal::Templates { selected }) => self.render_templates(frame, area, *selected),
            None => {}
        }
    }

    fn frame_block(&self, title: &'static str, border: ratatui::style::Color) -> Block<'static> {
        Block::default()
            .title(Span::styled(title, Style::default().fg(border).add_modifier(Modifier::BOLD)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(self.theme.panel())
    }

    fn render_confirm(&self, frame: &mut Frame<'_>, area: Rect) {
        let width = (CLEAR_PROMPT.len() as u16 + 4).max(30);
        let rect = centered_rect(area, width, 5);

        let lines = vec![
            Line::from(Span::styled(CLEAR_PROMPT, Style::default().fg(self.theme.fg))),
            Line::default(),
            Line::from(vec![
                Span::styled("[y]", Style::default().fg(self.theme.red)),
                Span::styled(" Yes   ", self.theme.muted()),
                Span::styled("[n]", Style::default().fg(self.theme.blue)),
                Span::styled(" No", self.theme.muted()),
            ]),
        ];

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(self.frame_block(" Clear chat ", self.theme.yellow)),
            rect,
        );
    }

    fn render_templates(&self, frame: &mut Frame<'_>, area: Rect, selected: usize) {
        let templates = &self.state.templates;
        let longest = templates.iter().map(|t| t.chars().count()).max().unwrap_or(0);
        let width = u16::try_from(longest + 8).unwrap_or(u16::MAX).max(30);
        let height = u16::try_from(templates.len() + 2).unwrap_or(u16::MAX);
        let rect = centered_rect(area, width, height);

        let lines: Vec<Line> = templates
            .iter()
            .enumerate()
            .map(|(i, template)| {
                let marker = if self.state.preferences.is_active_template(template) { "• " } else { "  " };
                let style = if i == selected { self.theme.active() } else { Style::default().fg(self.theme.fg) };
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(self.theme.green)),
                    Span::styled(template.clone(), style),
                ])
            })
            .collect();

        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(lines).block(self.frame_block(" Templates ", self.theme.blue)), rect);
    }
}
