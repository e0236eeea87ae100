// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pytutor shell` command implementation.
//!
//! Launches an interactive REPL with colored role prefixes, a spinner while a
//! question is pending, and readline history. One session per invocation.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pytutor_config::PyTutorConfig;
use pytutor_core::{ChatMessage, Role, SkillLevel, TutorError};
use pytutor_session::{SessionState, TutorSession, install_signal_handler};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::ask::read_code_file;
use crate::log_writer::LogWriter;

/// A line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Question(String),
    Topic(String),
    Level(String),
    Code(String),
    ClearCode,
    History,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

fn parse_command(line: &str) -> ShellCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ShellCommand::Question(trimmed.to_string());
    };

    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map(|(name, arg)| (name, arg.trim()))
        .unwrap_or((rest, ""));

    match name {
        "topic" => ShellCommand::Topic(arg.to_string()),
        "level" => ShellCommand::Level(arg.to_string()),
        "code" => ShellCommand::Code(arg.to_string()),
        "clear-code" => ShellCommand::ClearCode,
        "history" => ShellCommand::History,
        "help" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => ShellCommand::Unknown(other.to_string()),
    }
}

/// Topic, level and attached code carried between questions.
#[derive(Debug, Clone)]
struct ShellContext {
    topic: String,
    level: SkillLevel,
    code: String,
}

impl ShellContext {
    fn from_config(config: &PyTutorConfig) -> Self {
        Self {
            topic: config.tutor.topic.clone(),
            level: SkillLevel::parse_or_default(Some(&config.tutor.level)),
            code: String::new(),
        }
    }
}

/// Runs the `pytutor shell` interactive REPL.
pub async fn run_shell(config: &PyTutorConfig, logs: &LogWriter) -> Result<(), TutorError> {
    let client = crate::build_client(config)?;
    let shutdown = install_signal_handler();
    let mut session = TutorSession::with_cancellation(client, shutdown.child_token());
    let mut context = ShellContext::from_config(config);

    let mut rl = DefaultEditor::new()
        .map_err(|e| TutorError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "pytutor shell".bold().green());
    println!(
        "Type a question, {} for commands, {} to exit.\n",
        "/help".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", "you".cyan());
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };

        let command = parse_command(&line);
        if !matches!(command, ShellCommand::Empty) {
            let _ = rl.add_history_entry(line.as_str());
        }

        match command {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => print_help(),
            ShellCommand::Topic(topic) => {
                context.topic = topic;
                println!("{}", format!("topic set to `{}`", context.topic).dimmed());
            }
            ShellCommand::Level(raw) => {
                context.level = SkillLevel::parse_or_default(Some(&raw));
                println!("{}", format!("level set to {}", context.level).dimmed());
            }
            ShellCommand::Code(path) if path.is_empty() => {
                eprintln!("{}: usage: /code <path>", "error".red());
            }
            ShellCommand::Code(path) => match read_code_file(Path::new(&path)) {
                Ok(code) => {
                    println!(
                        "{}",
                        format!("attached {path} ({} chars)", code.chars().count()).dimmed()
                    );
                    context.code = code;
                }
                Err(e) => eprintln!("{}: {e}", "error".red()),
            },
            ShellCommand::ClearCode => {
                context.code.clear();
                println!("{}", "code attachment cleared".dimmed());
            }
            ShellCommand::History => {
                for message in session.conversation().all() {
                    print_message(message);
                }
            }
            ShellCommand::Unknown(name) => {
                eprintln!("{}: unknown command /{name} (try /help)", "error".red());
            }
            ShellCommand::Question(question) => {
                ask_and_print(&mut session, &context, &question, logs).await;
                if session.state() == SessionState::Closed {
                    break;
                }
            }
        }
    }

    shutdown.cancel();
    debug!(
        session_id = session.session_id(),
        messages = session.conversation().len(),
        "shell session ended"
    );
    Ok(())
}

async fn ask_and_print(
    session: &mut TutorSession,
    context: &ShellContext,
    question: &str,
    logs: &LogWriter,
) {
    let before = session.conversation().len();

    let spinner = thinking_spinner();
    let level = context.level.to_string();
    {
        // Retry warnings are printed above the spinner, not through it.
        let _attached = logs.attach(&spinner);
        let _ = session
            .ask(&context.topic, &context.code, question, Some(&level))
            .await;
    }
    spinner.finish_and_clear();

    // The user's own line is already on screen.
    for message in session.conversation().since(before) {
        if message.role() != Role::User {
            print_message(message);
        }
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message("asking the tutor...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_message(message: &ChatMessage) {
    let prefix = match message.role() {
        Role::User => "you".cyan(),
        Role::Tutor => "tutor".green().bold(),
        Role::System => "system".yellow(),
    };
    println!("{prefix}> {}\n", message.text());
}

fn print_help() {
    println!("  /topic <topic>   set the topic for following questions");
    println!("  /level <level>   beginner, intermediate or advanced");
    println!("  /code <path>     attach a Python file to following questions");
    println!("  /clear-code      drop the attached code");
    println!("  /history         show the conversation so far");
    println!("  /quit            leave the shell");
}
