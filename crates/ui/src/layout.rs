use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout breakpoints for responsive TUI
///
/// - >= 80 cols: full footer with key hints
/// - < 80 cols: compact, hints collapse to the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Full,
    Compact,
}

impl From<u16> for LayoutMode {
    fn from(width: u16) -> Self {
        match width {
            w if w >= 80 => Self::Full,
            _ => Self::Compact,
        }
    }
}

/// Calculated layout for the TUI
#[derive(Debug, Clone)]
pub struct TuiLayout {
    pub mode: LayoutMode,
    /// Title and status indicator (1 line)
    pub header: Rect,
    /// Message views
    pub transcript: Rect,
    /// Bordered input box, grows with its content
    pub input: Rect,
    /// Counter and key hints (1 line)
    pub hints: Rect,
}

impl TuiLayout {
    /// Split `area` for an input showing `input_rows` lines of text.
    pub fn calculate(area: Rect, input_rows: u16) -> Self {
        let mode = LayoutMode::from(area.width);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(input_rows.max(1) + 2),
                Constraint::Length(1),
            ])
            .split(area);

        Self { mode, header: chunks[0], transcript: chunks[1], input: chunks[2], hints: chunks[3] }
    }

    /// Split the hints row into the counter (right) and the hint text.
    pub fn hint_sections(&self) -> (Rect, Rect) {
        let counter_width = match self.mode {
            LayoutMode::Full => 12,
            LayoutMode::Compact => self.hints.width,
        };
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(counter_width)])
            .split(self.hints);
        (chunks[0], chunks[1])
    }
}

/// Shrink `area` by the given margins.
pub fn inset_area(area: Rect, left: u16, right: u16, top: u16, bottom: u16) -> Rect {
    Rect {
        x: area.x.saturating_add(left),
        y: area.y.saturating_add(top),
        width: area.width.saturating_sub(left + right),
        height: area.height.saturating_sub(top + bottom),
    }
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
