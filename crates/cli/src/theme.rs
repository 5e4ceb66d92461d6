use std::io;

use crossterm::{
    style::{style, Color, Stylize},
    tty::IsTty,
};

/// Colours used for console output.
#[derive(Debug, Clone)]
pub struct Theme {
    enabled: bool,
    accent: Color,
    success: Color,
    warning: Color,
    danger: Color,
    muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            enabled: true,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            muted: Color::DarkGrey,
        }
    }
}

impl Theme {
    /// Coloured output when stdout is a terminal, plain text otherwise.
    pub fn detect() -> Self {
        Self {
            enabled: io::stdout().is_tty(),
            ..Self::default()
        }
    }

    /// Theme that never emits escape sequences.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(text, self.accent)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, self.success)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, self.warning)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, self.danger)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(text, self.muted)
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }
}
