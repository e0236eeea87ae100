// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Covers constraints serde cannot express: URL shape, endpoint paths,
//! non-zero limits, and the length of the retry schedule.

use crate::diagnostic::ConfigError;
use crate::model::PyTutorConfig;

/// Upper bound on configured retry delays.
pub const MAX_RETRY_DELAYS: usize = 10;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every violation instead of stopping at the first one.
pub fn validate_config(config: &PyTutorConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let backend = &config.backend;

    if let Err(message) = check_base_url(&backend.base_url) {
        errors.push(ConfigError::Validation { message });
    }

    for (key, path) in [
        ("backend.ask_path", &backend.ask_path),
        ("backend.health_path", &backend.health_path),
    ] {
        if !path.starts_with('/') {
            errors.push(ConfigError::Validation {
                message: format!("{key} must start with `/`, got `{path}`"),
            });
        }
    }

    if backend.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.timeout_secs must be greater than zero".to_string(),
        });
    }

    if backend.retry_delays_secs.len() > MAX_RETRY_DELAYS {
        errors.push(ConfigError::Validation {
            message: format!(
                "backend.retry_delays_secs allows at most {MAX_RETRY_DELAYS} entries, got {}",
                backend.retry_delays_secs.len()
            ),
        });
    }

    if config.tutor.max_code_chars == 0 {
        errors.push(ConfigError::Validation {
            message: "tutor.max_code_chars must be greater than zero".to_string(),
        });
    }

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that the base URL parses as absolute http(s) with a host.
fn check_base_url(raw: &str) -> Result<(), String> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| format!("backend.base_url `{raw}` is not a valid URL: {e}"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!(
            "backend.base_url `{raw}` must use http or https, got `{}`",
            parsed.scheme()
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("backend.base_url `{raw}` has no host"));
    }
    Ok(())
}
