// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rubrica extension` and `rubrica theme` command implementations.

use clap::ValueEnum;
use rubrica_client::ClientSettings;
use rubrica_core::RubricaError;

/// Theme names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Dark,
    Light,
}

impl ThemeChoice {
    fn from_dark(dark: bool) -> Self {
        if dark { ThemeChoice::Dark } else { ThemeChoice::Light }
    }

    fn name(self) -> &'static str {
        match self {
            ThemeChoice::Dark => "dark",
            ThemeChoice::Light => "light",
        }
    }
}

/// Print the saved extension, or replace it.
///
/// Setting an empty value clears it for this process only; the saved
/// extension stays on disk.
pub fn run_extension(settings: &ClientSettings, value: Option<&str>) -> Result<(), RubricaError> {
    match value {
        None => {
            let extension = settings.extension();
            if extension.is_empty() {
                println!("no extension set");
            } else {
                println!("{extension}");
            }
        }
        Some(value) => {
            settings.set_extension(value)?;
            if value.is_empty() {
                println!("extension cleared for this session; the saved value is kept");
            } else {
                println!("extension set to {value}");
            }
        }
    }
    Ok(())
}

/// Print the saved theme, or replace it.
pub fn run_theme(settings: &ClientSettings, choice: Option<ThemeChoice>) -> Result<(), RubricaError> {
    match choice {
        None => println!("{}", ThemeChoice::from_dark(settings.is_dark()).name()),
        Some(choice) => {
            settings.set_theme(choice == ThemeChoice::Dark)?;
            println!("theme set to {}", choice.name());
        }
    }
    Ok(())
}
