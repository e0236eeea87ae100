// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pytutor ask` command implementation.
//!
//! Sends one question through a session bound to the process signal
//! handler, so Ctrl+C abandons the in-flight request cleanly.

use std::path::{Path, PathBuf};

use pytutor_config::PyTutorConfig;
use pytutor_core::{TutorError, TutorReply};
use pytutor_session::{EMPTY_ANSWER_NOTICE, TutorSession, failure_notice, install_signal_handler};
use tracing::debug;

/// Arguments of a one-shot ask.
#[derive(Debug, Clone, Default)]
pub struct AskRequest {
    pub question: String,
    pub topic: Option<String>,
    pub level: Option<String>,
    pub code_file: Option<PathBuf>,
}

impl AskRequest {
    /// Topic to send, falling back to the configured default.
    pub fn topic<'a>(&'a self, config: &'a PyTutorConfig) -> &'a str {
        self.topic.as_deref().unwrap_or(&config.tutor.topic)
    }

    /// Level to send, falling back to the configured default.
    pub fn level<'a>(&'a self, config: &'a PyTutorConfig) -> &'a str {
        self.level.as_deref().unwrap_or(&config.tutor.level)
    }
}

/// Runs `pytutor ask`, printing the answer to stdout.
pub async fn run_ask(config: &PyTutorConfig, request: AskRequest) -> Result<(), TutorError> {
    let code = match &request.code_file {
        Some(path) => read_code_file(path)?,
        None => String::new(),
    };

    let client = crate::build_client(config)?;
    let shutdown = install_signal_handler();
    let mut session = TutorSession::with_cancellation(client, shutdown.child_token());

    let result = session
        .ask(
            request.topic(config),
            &code,
            &request.question,
            Some(request.level(config)),
        )
        .await;
    shutdown.cancel();

    match result {
        Ok(TutorReply::Answer { text, attempts, .. }) => {
            debug!(attempts, "answer received");
            println!("{text}");
            Ok(())
        }
        Ok(TutorReply::EmptyAnswer { .. }) => {
            eprintln!("{EMPTY_ANSWER_NOTICE}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", failure_notice(&e));
            Err(e)
        }
    }
}

/// Reads the code attachment; a missing or unreadable file is a validation error.
pub fn read_code_file(path: &Path) -> Result<String, TutorError> {
    std::fs::read_to_string(path).map_err(|e| {
        TutorError::Validation(format!("cannot read code file {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_code_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "print('hi')").unwrap();

        assert_eq!(read_code_file(file.path()).unwrap(), "print('hi')");
    }

    #[test]
    fn missing_code_file_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_code_file(&dir.path().join("absent.py")).unwrap_err();
        assert!(matches!(err, TutorError::Validation(ref m) if m.contains("absent.py")));
    }

    #[test]
    fn falls_back_to_configured_topic_and_level() {
        let config = pytutor_config::load_and_validate_str(
            "[tutor]\ntopic = \"recursion\"\nlevel = \"intermediate\"\n",
        )
        .unwrap();

        let request = AskRequest {
            question: "why?".into(),
            ..AskRequest::default()
        };
        assert_eq!(request.topic(&config), "recursion");
        assert_eq!(request.level(&config), "intermediate");

        let request = AskRequest {
            question: "why?".into(),
            topic: Some("loops".into()),
            level: Some("advanced".into()),
            code_file: None,
        };
        assert_eq!(request.topic(&config), "loops");
        assert_eq!(request.level(&config), "advanced");
    }
}
