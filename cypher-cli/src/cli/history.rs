// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! # History File Management
//!
//! By default, history is stored in `~/.cypher_console_history`. The
//! location can be overridden with `--history-file` or the
//! `CYPHER_CONSOLE_HISTORY` environment variable:
//!
//! ```bash
//! export CYPHER_CONSOLE_HISTORY=/custom/path/history
//! cypher
//! ```
//!
//! An empty value for either disables history persistence.

use std::env;
use std::path::PathBuf;

const DEFAULT_HISTORY_FILE: &str = ".cypher_console_history";
const HISTORY_ENV_VAR: &str = "CYPHER_CONSOLE_HISTORY";

/// History location: the flag wins, then the environment, then the home directory
pub fn resolve(flag: Option<&str>) -> Option<PathBuf> {
    match flag {
        Some("") => None,
        Some(path) => Some(PathBuf::from(path)),
        None => history_path(),
    }
}

pub fn history_path() -> Option<PathBuf> {
    if let Ok(custom_path) = env::var(HISTORY_ENV_VAR) {
        if custom_path.is_empty() {
            return None;
        }
        return Some(PathBuf::from(custom_path));
    }

    home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE))
}

fn home_dir() -> Option<PathBuf> {
    env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn default_history_path_is_in_home() {
        env::remove_var(HISTORY_ENV_VAR);

        if let Some(path) = history_path() {
            assert!(path.to_string_lossy().contains(".cypher_console_history"));
        }
    }

    #[test]
    #[serial]
    fn custom_history_path_from_env() {
        env::set_var(HISTORY_ENV_VAR, "/custom/path");
        let path = history_path();
        env::remove_var(HISTORY_ENV_VAR);

        assert_eq!(path, Some(PathBuf::from("/custom/path")));
    }

    #[test]
    #[serial]
    fn empty_env_disables_history() {
        env::set_var(HISTORY_ENV_VAR, "");
        let path = history_path();
        env::remove_var(HISTORY_ENV_VAR);

        assert_eq!(path, None);
    }

    #[test]
    #[serial]
    fn flag_takes_precedence_over_env() {
        env::set_var(HISTORY_ENV_VAR, "/from/env");
        let path = resolve(Some("/from/flag"));
        let disabled = resolve(Some(""));
        env::remove_var(HISTORY_ENV_VAR);

        assert_eq!(path, Some(PathBuf::from("/from/flag")));
        assert_eq!(disabled, None);
    }
}
