// SPDX-FileCopyrightText: 2026 Rubrica Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rubrica - directory and dialing client for a PBX backend.
//!
//! This is the binary entry point.

mod call;
mod contacts;
mod palette;
mod preferences;
mod shutdown;
mod status;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rubrica_client::RubricaClient;
use rubrica_config::RubricaConfig;

use crate::preferences::ThemeChoice;

/// Rubrica - browse the company directory and place calls through the PBX.
#[derive(Parser, Debug)]
#[command(name = "rubrica", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Probe the backend once and show PBX connectivity.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// List directory contacts, optionally filtered by name or number.
    Contacts {
        query: Option<String>,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        plain: bool,
    },
    /// Call a number from your extension.
    Call {
        number: String,
        /// Name shown in the confirmation.
        #[arg(long)]
        name: Option<String>,
        /// Call from this extension instead of the saved one.
        #[arg(long)]
        extension: Option<String>,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        plain: bool,
    },
    /// Show or set your origin extension.
    Extension { value: Option<String> },
    /// Show or set the color theme.
    Theme {
        #[arg(value_enum)]
        choice: Option<ThemeChoice>,
    },
    /// Watch PBX connectivity until interrupted.
    Watch {
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => rubrica_config::load_and_validate_path(path),
        None => rubrica_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            rubrica_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.client.log_level);

    let client = match RubricaClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("rubrica: {e}");
            return ExitCode::FAILURE;
        }
    };

    if run(cli.command, &client, &config).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Runs one command; returns whether it succeeded.
async fn run(command: Commands, client: &RubricaClient, config: &RubricaConfig) -> bool {
    let report = |result: Result<(), rubrica_core::RubricaError>| match result {
        Ok(()) => true,
        Err(e) => {
            eprintln!("rubrica: {e}");
            false
        }
    };

    match command {
        Commands::Status { json, plain } => {
            status::run_status(client, &config.backend.base_url(), json, plain).await
        }
        Commands::Contacts { query, json, plain } => {
            report(contacts::run_contacts(client, query.as_deref(), json, plain).await)
        }
        Commands::Call {
            number,
            name,
            extension,
            json,
            plain,
        } => {
            call::run_call(
                client,
                &number,
                name.as_deref(),
                extension.as_deref(),
                json,
                plain,
            )
            .await
        }
        Commands::Extension { value } => {
            report(preferences::run_extension(client.settings(), value.as_deref()))
        }
        Commands::Theme { choice } => report(preferences::run_theme(client.settings(), choice)),
        Commands::Watch { plain } => {
            let cancel = shutdown::install_signal_handler();
            watch::run_watch(client, cancel, plain).await;
            true
        }
    }
}

/// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rubrica={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
