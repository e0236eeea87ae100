// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Question payload construction.

use pytutor_core::{SkillLevel, TutorError};
use serde::Serialize;

/// Default cap on the number of characters of code sent to the backend.
pub const MAX_CODE_CHARS: usize = 100_000;

/// Appended to code that was cut at the character cap.
pub const TRUNCATION_MARKER: &str = "\n# ... [code truncated]";

/// A validated question, ready to serialize as the request body.
///
/// Only [`PayloadBuilder::build`] creates these, so `question` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionPayload {
    topic: String,
    code: String,
    question: String,
    level: SkillLevel,
}

impl QuestionPayload {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn level(&self) -> SkillLevel {
        self.level
    }
}

/// Builds [`QuestionPayload`]s from raw user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadBuilder {
    max_code_chars: usize,
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self {
            max_code_chars: MAX_CODE_CHARS,
        }
    }
}

impl PayloadBuilder {
    pub fn new(max_code_chars: usize) -> Self {
        Self { max_code_chars }
    }

    /// Trims topic and question, bounds the code, and normalizes the level.
    ///
    /// Fails only when the trimmed question is empty.
    pub fn build(
        &self,
        topic: &str,
        code: &str,
        question: &str,
        level: Option<&str>,
    ) -> Result<QuestionPayload, TutorError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TutorError::Validation("empty question".into()));
        }

        Ok(QuestionPayload {
            topic: topic.trim().to_string(),
            code: truncate_code(code, self.max_code_chars),
            question: question.to_string(),
            level: SkillLevel::parse_or_default(level),
        })
    }
}

/// Cuts `code` to `max_chars` characters and appends [`TRUNCATION_MARKER`].
///
/// Code at or under the cap is returned unchanged.
pub fn truncate_code(code: &str, max_chars: usize) -> String {
    match code.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut truncated = String::with_capacity(cut + TRUNCATION_MARKER.len());
            truncated.push_str(&code[..cut]);
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => code.to_string(),
    }
}
