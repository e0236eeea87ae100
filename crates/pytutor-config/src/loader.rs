// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/pytutor/pytutor.toml`, then `~/.config/pytutor/pytutor.toml`,
//! then `./pytutor.toml`, then `PYTUTOR_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PyTutorConfig;

/// File name searched for in every configuration directory.
pub const CONFIG_FILE_NAME: &str = "pytutor.toml";

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/pytutor/pytutor.toml";

/// Per-user configuration file under the XDG config directory, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pytutor").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pytutor/pytutor.toml`
/// 3. `~/.config/pytutor/pytutor.toml`
/// 4. `./pytutor.toml`
/// 5. `PYTUTOR_*` environment variables
pub fn load_config() -> Result<PyTutorConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<PyTutorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PyTutorConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PyTutorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PyTutorConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the full layered Figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(PyTutorConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Maps `PYTUTOR_<SECTION>_<KEY>` onto `<section>.<key>`.
///
/// Only the first underscore after the section name is turned into a dot, so
/// `PYTUTOR_BACKEND_RETRY_DELAYS_SECS` becomes `backend.retry_delays_secs`.
fn env_provider() -> Env {
    Env::prefixed("PYTUTOR_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        ["backend", "tutor", "logging"]
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key_str)
            .into()
    })
}
