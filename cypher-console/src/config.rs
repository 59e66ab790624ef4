// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Console configuration
//!
//! Resolved once at startup by the binary (arguments, environment variables,
//! literal fallbacks) and read-only afterwards. `/config` shows it as a
//! sorted key→value mapping.

use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_URI: &str = "http://localhost:7474";
pub const DEFAULT_USER: &str = "neo4j";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_DATABASE: &str = "neo4j";
pub const DEFAULT_COMMAND_PREFIX: &str = "/";
pub const DEFAULT_HISTORY_LENGTH: usize = 1000;

/// Server error prefixes that mean "statement is not finished yet"
pub const DEFAULT_CONTINUATION_PHRASES: &[&str] =
    &["Unexpected end of input", "Query cannot conclude with"];

/// Leading keywords that make a buffer look like a Cypher statement
pub const DEFAULT_STATEMENT_KEYWORDS: &[&str] = &[
    "ALTER", "CALL", "CREATE", "CYPHER", "DEALLOCATE", "DELETE", "DENY", "DETACH", "DROP",
    "EXPLAIN", "FOREACH", "GRANT", "LOAD", "MATCH", "MERGE", "OPTIONAL", "PROFILE", "REMOVE",
    "RENAME", "RETURN", "REVOKE", "SET", "SHOW", "START", "STOP", "TERMINATE", "UNWIND", "USE",
    "USING", "WITH",
];

const MASK: &str = "********";

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub command_prefix: String,
    /// `None` disables history persistence
    pub history_file: Option<PathBuf>,
    pub history_length: usize,
    pub continuation_phrases: Vec<String>,
    pub statement_keywords: Vec<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            history_file: None,
            history_length: DEFAULT_HISTORY_LENGTH,
            continuation_phrases: DEFAULT_CONTINUATION_PHRASES
                .iter()
                .map(|phrase| phrase.to_string())
                .collect(),
            statement_keywords: DEFAULT_STATEMENT_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
        }
    }
}

impl ConsoleConfig {
    /// All settings as display strings, sorted by key. The password is masked.
    pub fn entries(&self) -> BTreeMap<String, String> {
        let history_file = self
            .history_file
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "(disabled)".to_string());

        [
            ("connection.uri", self.uri.clone()),
            ("connection.user", self.user.clone()),
            ("connection.password", MASK.to_string()),
            ("connection.database", self.database.clone()),
            ("console.command_prefix", self.command_prefix.clone()),
            ("console.history_file", history_file),
            ("console.history_length", self.history_length.to_string()),
            ("dispatch.continuation_phrases", self.continuation_phrases.join("; ")),
            ("dispatch.statement_keywords", self.statement_keywords.join(" ")),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
    }

    /// Entries whose key contains `search_term`, or all entries without one
    pub fn matching(&self, search_term: Option<&str>) -> Vec<(String, String)> {
        self.entries()
            .into_iter()
            .filter(|(key, _)| search_term.map_or(true, |term| key.contains(term)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_sorted_and_mask_the_password() {
        let config = ConsoleConfig {
            password: "secret".to_string(),
            ..ConsoleConfig::default()
        };
        let entries = config.entries();

        let keys: Vec<&String> = entries.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        assert_eq!(entries["connection.password"], "********");
        assert!(!entries.values().any(|value| value.contains("secret")));
        assert_eq!(entries["console.command_prefix"], "/");
        assert_eq!(entries["console.history_length"], "1000");
    }

    #[test]
    fn search_term_filters_on_key_substring() {
        let config = ConsoleConfig::default();

        let connection: Vec<String> = config
            .matching(Some("connection"))
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(
            connection,
            vec![
                "connection.database",
                "connection.password",
                "connection.uri",
                "connection.user"
            ]
        );

        assert!(config.matching(Some("nothing-matches")).is_empty());
        assert_eq!(config.matching(None).len(), config.entries().len());
    }

    #[test]
    fn history_can_be_disabled() {
        let config = ConsoleConfig::default();
        assert_eq!(config.entries()["console.history_file"], "(disabled)");
    }
}
