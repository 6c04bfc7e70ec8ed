//! Theme, font size and last-used template.
//!
//! Each value lives in its own storage slot. Storage failures are logged and
//! otherwise ignored; the in-memory value still changes.

use crate::storage::{FONT_SIZE_KEY, KeyValueStore, LAST_TEMPLATE_KEY, THEME_KEY};

use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label of the toggle control: names the mode it switches to.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Light => "Dark Mode",
            Theme::Dark => "Light Mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub const VALUES: &[FontSize] = &[FontSize::Small, FontSize::Medium, FontSize::Large];

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" => Some(FontSize::Small),
            "medium" => Some(FontSize::Medium),
            "large" => Some(FontSize::Large),
            _ => None,
        }
    }

    /// Unknown values fall back to medium.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse_str(s).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }

    /// Label shown by the size selector.
    pub fn label(&self) -> &'static str {
        match self {
            FontSize::Small => "Small",
            FontSize::Medium => "Medium",
            FontSize::Large => "Large",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            FontSize::Small => FontSize::Medium,
            FontSize::Medium => FontSize::Large,
            FontSize::Large => FontSize::Small,
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persisted presentation preferences.
pub struct Preferences {
    theme: Theme,
    font_size: FontSize,
    last_template: Option<String>,
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("theme", &self.theme)
            .field("font_size", &self.font_size)
            .field("last_template", &self.last_template)
            .finish_non_exhaustive()
    }
}

impl Preferences {
    /// Read all three slots; missing or unreadable values use defaults.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read preference");
                None
            }
        };

        let theme = read(THEME_KEY).and_then(|v| Theme::parse_str(&v)).unwrap_or_default();
        let font_size = read(FONT_SIZE_KEY).map(|v| FontSize::parse_or_default(&v)).unwrap_or_default();
        let last_template = read(LAST_TEMPLATE_KEY);

        Self { theme, font_size, last_template, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn last_template(&self) -> Option<&str> {
        self.last_template.as_deref()
    }

    /// Whether `template` is the one marked active.
    pub fn is_active_template(&self, template: &str) -> bool {
        self.last_template.as_deref() == Some(template)
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist(THEME_KEY, theme.as_str());
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.theme.toggled();
        self.apply_theme(theme);
        theme
    }

    /// Apply a raw selector value; unknown values become medium everywhere.
    pub fn apply_font_size(&mut self, raw: &str) -> FontSize {
        let size = FontSize::parse_or_default(raw);
        self.font_size = size;
        self.persist(FONT_SIZE_KEY, size.as_str());
        size
    }

    pub fn cycle_font_size(&mut self) -> FontSize {
        let next = self.font_size.next();
        self.apply_font_size(next.as_str())
    }

    pub fn set_last_template(&mut self, template: &str) {
        self.last_template = Some(template.to_string());
        self.persist(LAST_TEMPLATE_KEY, template);
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, error = %e, "failed to save preference");
        }
    }
}
