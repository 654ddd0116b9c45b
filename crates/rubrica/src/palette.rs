// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal colors, chosen from the saved theme.

use std::io::IsTerminal;

use colored::{Color, Colorize};
use tokio::sync::watch;

/// Colors for one command's output.
///
/// The dark theme uses the bright variants. With color disabled every
/// method returns its input unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color: bool,
    dark: bool,
}

impl Palette {
    /// Color is on unless `plain` is set or stdout is not a terminal.
    pub fn detect(plain: bool, dark: bool) -> Self {
        Self::new(!plain && std::io::stdout().is_terminal(), dark)
    }

    pub fn new(color: bool, dark: bool) -> Self {
        Self { color, dark }
    }

    fn paint(&self, text: &str, light: Color, dark: Color) -> String {
        if !self.color {
            return text.to_string();
        }
        let color = if self.dark { dark } else { light };
        text.color(color).to_string()
    }

    pub fn ok(&self, text: &str) -> String {
        self.paint(text, Color::Green, Color::BrightGreen)
    }

    pub fn fail(&self, text: &str) -> String {
        self.paint(text, Color::Red, Color::BrightRed)
    }

    pub fn warn(&self, text: &str) -> String {
        self.paint(text, Color::Yellow, Color::BrightYellow)
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(text, Color::Blue, Color::BrightCyan)
    }

    pub fn dim(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        text.dimmed().to_string()
    }

    /// `✓`/`✗` with color, `[OK]`/`[FAIL]` without.
    pub fn mark(&self, success: bool) -> String {
        match (self.color, success) {
            (true, true) => self.ok("✓"),
            (true, false) => self.fail("✗"),
            (false, true) => "[OK]".to_string(),
            (false, false) => "[FAIL]".to_string(),
        }
    }
}

/// A palette that follows theme changes while a long-running command prints.
pub struct ThemedPalette {
    plain: bool,
    theme: watch::Receiver<bool>,
}

impl ThemedPalette {
    pub fn new(plain: bool, theme: watch::Receiver<bool>) -> Self {
        Self { plain, theme }
    }

    /// The palette for the theme currently in effect.
    pub fn current(&mut self) -> Palette {
        Palette::detect(self.plain, *self.theme.borrow_and_update())
    }
}
