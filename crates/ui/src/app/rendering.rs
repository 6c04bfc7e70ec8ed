use super::App;
use crate::components::{Footer, Header, ModalView, Transcript};
use crate::layout::{TuiLayout, inset_area};
use crate::theme::Theme;

use ratatui::{Frame, widgets::Block};
use std::time::Instant;

pub fn render(app: &App, frame: &mut Frame<'_>, now: Instant) {
    let size = frame.area();
    let theme = Theme::palette(app.state.preferences.theme());
    frame.render_widget(Block::default().style(theme.base()), size);

    let content_area = inset_area(size, 1, 1, 0, 0);
    let input_rows = app.state.input.visible_rows(content_area.width.saturating_sub(2));
    let layout = TuiLayout::calculate(content_area, input_rows);

    let views = app.controller.renderer();

    Header::new(&app.state, views.status(), theme).render(frame, layout.header);
    Transcript::new(views, &app.state, theme, now).render(frame, layout.transcript);
    Footer::new(&app.state, theme).render(frame, &layout);

    if app.state.modal.is_some() {
        ModalView::new(&app.state, theme).render(frame, size);
    }
}
