// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the PyTutor client.
//!
//! TOML files layered with `PYTUTOR_*` environment overrides, strict
//! unknown-key rejection, and miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use pytutor_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("backend: {}", config.backend.base_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{BackendConfig, LoggingConfig, PyTutorConfig, TutorConfig};

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<PyTutorConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file (plus environment) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<PyTutorConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<PyTutorConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validate a successful extraction, or convert the Figment error into
/// diagnostics using the sources produced by `sources` (read lazily).
fn finish(
    loaded: Result<PyTutorConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<PyTutorConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Read every config file in the hierarchy that exists, for span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::CONFIG_FILE_NAME))
        .ok();
    [
        Some(Path::new(loader::SYSTEM_CONFIG_PATH).to_path_buf()),
        loader::user_config_path(),
        local,
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| {
        std::fs::read_to_string(&path)
            .ok()
            .map(|content| (path.display().to_string(), content))
    })
    .collect()
}
