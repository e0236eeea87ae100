// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the PyTutor client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level PyTutor configuration.
///
/// Every section is optional and defaults to values that talk to a backend
/// running on the local machine.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PyTutorConfig {
    /// Tutoring backend endpoint and request policy.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Defaults for the questions sent to the tutor.
    #[serde(default)]
    pub tutor: TutorConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tutoring backend endpoint and request policy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Scheme, host and port of the backend, e.g. `http://127.0.0.1:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the question endpoint.
    #[serde(default = "default_ask_path")]
    pub ask_path: String,

    /// Path of the health endpoint.
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Per-attempt timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Waits before attempts 2..N, in seconds. The first attempt never waits.
    #[serde(default = "default_retry_delays_secs")]
    pub retry_delays_secs: Vec<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ask_path: default_ask_path(),
            health_path: default_health_path(),
            timeout_secs: default_timeout_secs(),
            retry_delays_secs: default_retry_delays_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_ask_path() -> String {
    "/ask-ai".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_timeout_secs() -> u64 {
    25
}

fn default_retry_delays_secs() -> Vec<u64> {
    vec![1, 2, 4]
}

/// Defaults applied to every question.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TutorConfig {
    /// Topic sent when the user has not chosen one.
    #[serde(default)]
    pub topic: String,

    /// Skill level (beginner, intermediate, advanced). Unknown values fall back to beginner.
    #[serde(default = "default_level")]
    pub level: String,

    /// Code longer than this many characters is truncated before sending.
    #[serde(default = "default_max_code_chars")]
    pub max_code_chars: usize,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            level: default_level(),
            max_code_chars: default_max_code_chars(),
        }
    }
}

fn default_level() -> String {
    "beginner".to_string()
}

fn default_max_code_chars() -> usize {
    100_000
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
