// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PyTutor - ask a Python tutor from the terminal.
//!
//! This is the binary entry point.

mod ask;
mod log_writer;
mod shell;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use pytutor_client::{ClientSettings, TutorClient};
use pytutor_config::PyTutorConfig;
use pytutor_core::TutorError;

use crate::log_writer::LogWriter;

/// PyTutor - ask a Python tutor from the terminal.
#[derive(Parser, Debug)]
#[command(name = "pytutor", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question and print the answer.
    Ask {
        /// The question to ask.
        #[arg(short, long)]
        question: String,
        /// Topic the question is about (defaults to `tutor.topic`).
        #[arg(short, long)]
        topic: Option<String>,
        /// Skill level: beginner, intermediate or advanced.
        #[arg(short, long)]
        level: Option<String>,
        /// Python file whose contents are sent along with the question.
        #[arg(short, long, value_name = "PATH")]
        code_file: Option<PathBuf>,
    },
    /// Launch an interactive tutoring session.
    Shell,
    /// Check whether the tutoring backend is reachable.
    Health,
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => pytutor_config::load_and_validate_path(path),
        None => pytutor_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            pytutor_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let log_writer = LogWriter::default();
    init_tracing(&config.logging.level, log_writer.clone());

    let result = match cli.command {
        Some(Commands::Ask {
            question,
            topic,
            level,
            code_file,
        }) => {
            let request = ask::AskRequest {
                question,
                topic,
                level,
                code_file,
            };
            ask::run_ask(&config, request).await
        }
        Some(Commands::Shell) => shell::run_shell(&config, &log_writer).await,
        Some(Commands::Health) => status::run_health(&config).await,
        Some(Commands::Config) => status::print_config(&config),
        None => {
            println!("pytutor: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Builds the HTTP-backed client from the loaded configuration.
pub(crate) fn build_client(config: &PyTutorConfig) -> Result<TutorClient, TutorError> {
    TutorClient::new(&ClientSettings::from_config(config))
}

/// Initialize the tracing subscriber, writing to stderr so stdout stays clean
/// for answers. Output goes through `writer` so an attached spinner is
/// suspended while a line is written.
fn init_tracing(log_level: &str, writer: LogWriter) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pytutor={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
