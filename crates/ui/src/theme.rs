use ratatui::style::{Color, Style};

pub use relaychat_core::preferences::Theme as ThemeVariant;

/// Iceberg color theme for the chat TUI
///
/// Based on iceberg.vim color scheme (https://github.com/cocopon/iceberg.vim).
/// The constants are the dark variant; [`Theme::palette`] resolves either variant.
#[derive(Debug, Clone, Copy)]
pub struct Theme;

/// Resolved colors for one theme variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub bg: Color,
    pub fg: Color,
    pub panel_bg: Color,
    pub active: Color,
    pub muted: Color,
    pub blue: Color,
    pub cyan: Color,
    pub purple: Color,
    pub green: Color,
    pub yellow: Color,
    pub red: Color,
    pub border: Color,
}

impl Theme {
    /// Primary background: deep blue-black (fills terminal)
    pub const BG: Color = Color::Rgb(22, 24, 33);

    /// Foreground: light blue-gray (primary text)
    pub const FG: Color = Color::Rgb(198, 200, 209);

    /// Secondary background: message cards and input
    pub const PANEL_BG: Color = Color::Rgb(30, 33, 50);

    /// Selected message
    pub const ACTIVE: Color = Color::Rgb(39, 44, 66);

    /// Primary accent: blue (user messages)
    pub const BLUE: Color = Color::Rgb(132, 160, 198);

    pub const CYAN: Color = Color::Rgb(137, 184, 194);

    /// Assistant messages
    pub const PURPLE: Color = Color::Rgb(160, 147, 199);

    /// Ready status
    pub const GREEN: Color = Color::Rgb(180, 190, 130);

    /// Processing status
    pub const YELLOW: Color = Color::Rgb(226, 164, 120);

    /// Errors and the overflowing counter
    pub const RED: Color = Color::Rgb(226, 120, 120);

    /// Muted text: timestamps, hints, disabled controls
    pub const MUTED: Color = Color::Rgb(107, 112, 137);

    pub const BORDER: Color = Color::Rgb(60, 65, 90);

    const DARK: ThemePalette = ThemePalette {
        bg: Self::BG,
        fg: Self::FG,
        panel_bg: Self::PANEL_BG,
        active: Self::ACTIVE,
        muted: Self::MUTED,
        blue: Self::BLUE,
        cyan: Self::CYAN,
        purple: Self::PURPLE,
        green: Self::GREEN,
        yellow: Self::YELLOW,
        red: Self::RED,
        border: Self::BORDER,
    };

    /// Iceberg light
    const LIGHT: ThemePalette = ThemePalette {
        bg: Color::Rgb(232, 233, 236),
        fg: Color::Rgb(51, 55, 79),
        panel_bg: Color::Rgb(220, 223, 231),
        active: Color::Rgb(201, 205, 215),
        muted: Color::Rgb(129, 134, 155),
        blue: Color::Rgb(45, 83, 157),
        cyan: Color::Rgb(63, 131, 166),
        purple: Color::Rgb(119, 89, 180),
        green: Color::Rgb(102, 142, 61),
        yellow: Color::Rgb(196, 110, 52),
        red: Color::Rgb(204, 81, 122),
        border: Color::Rgb(167, 172, 190),
    };

    pub fn palette(variant: ThemeVariant) -> ThemePalette {
        match variant {
            ThemeVariant::Dark => Self::DARK,
            ThemeVariant::Light => Self::LIGHT,
        }
    }
}

impl ThemePalette {
    /// Base style for all text
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn panel(&self) -> Style {
        Style::default().fg(self.fg).bg(self.panel_bg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Active (selected) style
    pub fn active(&self) -> Style {
        Style::default().fg(self.fg).bg(self.active)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.red)
    }
}
