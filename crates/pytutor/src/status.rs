// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pytutor health` and `pytutor config` command implementations.

use colored::Colorize;
use pytutor_config::PyTutorConfig;
use pytutor_core::{HealthStatus, TutorError};

/// Probes the backend once and prints the result.
///
/// Anything other than healthy is reported as an error so the process exits 1.
pub async fn run_health(config: &PyTutorConfig) -> Result<(), TutorError> {
    let client = crate::build_client(config)?;
    let status = client.health_check().await;
    println!("{}", format_health(&config.backend.base_url, &status));

    match status {
        HealthStatus::Healthy => Ok(()),
        HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => {
            Err(TutorError::Terminal {
                status: None,
                message: format!("backend is not healthy: {reason}"),
            })
        }
    }
}

fn format_health(base_url: &str, status: &HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => format!("{} {base_url}", "healthy".green().bold()),
        HealthStatus::Degraded(reason) => {
            format!("{} {base_url} ({reason})", "degraded".yellow().bold())
        }
        HealthStatus::Unhealthy(reason) => {
            format!("{} {base_url} ({reason})", "unhealthy".red().bold())
        }
    }
}

/// Prints the effective configuration as TOML.
pub fn print_config(config: &PyTutorConfig) -> Result<(), TutorError> {
    print!("{}", render_config(config)?);
    Ok(())
}

fn render_config(config: &PyTutorConfig) -> Result<String, TutorError> {
    toml::to_string_pretty(config)
        .map_err(|e| TutorError::Internal(format!("failed to serialize configuration: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_config_round_trips_through_loader() {
        let config = pytutor_config::load_and_validate_str(
            "[backend]\nbase_url = \"https://tutor.example.com\"\nretry_delays_secs = [2, 4]\n",
        )
        .unwrap();

        let rendered = render_config(&config).unwrap();
        assert!(rendered.contains("[backend]"));
        assert!(rendered.contains("https://tutor.example.com"));

        let reloaded = pytutor_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn health_line_names_the_backend() {
        colored::control::set_override(false);
        assert_eq!(
            format_health("http://127.0.0.1:5000", &HealthStatus::Healthy),
            "healthy http://127.0.0.1:5000"
        );
        assert_eq!(
            format_health(
                "http://127.0.0.1:5000",
                &HealthStatus::Unhealthy("timeout".into())
            ),
            "unhealthy http://127.0.0.1:5000 (timeout)"
        );
    }
}
