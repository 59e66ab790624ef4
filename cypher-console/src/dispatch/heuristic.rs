// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statement heuristics
//!
//! Neither check here is a grammar check:
//! - a buffer "looks like" a statement when its first word is one of the
//!   configured Cypher keywords
//! - a syntax error means "not finished yet" when the server message starts
//!   with one of the configured continuation phrases; every other syntax
//!   error is final
//!
//! Both lists are configurable because server wording differs between
//! versions.

use regex::Regex;

use crate::config::ConsoleConfig;
use crate::driver::QueryOutcome;
use crate::error::{Error, Result};

/// Result of executing a buffer as a complete statement
#[derive(Debug)]
pub enum StatementStatus {
    Complete(QueryOutcome),
    /// The server expects more input; keep the buffer
    Incomplete,
    HardError(Error),
}

pub struct StatementHeuristic {
    /// `None` when no keywords are configured; nothing looks like a statement
    leading_keyword: Option<Regex>,
    continuation_phrases: Vec<String>,
}

impl StatementHeuristic {
    pub fn new(keywords: &[String], continuation_phrases: &[String]) -> Result<Self> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|keyword| keyword.trim())
            .filter(|keyword| !keyword.is_empty())
            .map(regex::escape)
            .collect();
        let leading_keyword = if alternatives.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"(?i)^\s*(?:{})\b", alternatives.join("|")))?)
        };

        Ok(Self {
            leading_keyword,
            continuation_phrases: continuation_phrases
                .iter()
                .filter(|phrase| !phrase.is_empty())
                .cloned()
                .collect(),
        })
    }

    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        Self::new(&config.statement_keywords, &config.continuation_phrases)
    }

    pub fn looks_like_statement(&self, source: &str) -> bool {
        self.leading_keyword
            .as_ref()
            .map_or(false, |regex| regex.is_match(source))
    }

    /// Whether a server syntax message reports a truncated statement
    pub fn is_truncation(&self, message: &str) -> bool {
        self.continuation_phrases
            .iter()
            .any(|phrase| message.starts_with(phrase.as_str()))
    }

    pub fn classify(&self, result: Result<QueryOutcome>) -> StatementStatus {
        match result {
            Ok(outcome) => StatementStatus::Complete(outcome),
            Err(error) => {
                let truncated = error
                    .syntax_message()
                    .map_or(false, |message| self.is_truncation(message));
                if truncated {
                    StatementStatus::Incomplete
                } else {
                    StatementStatus::HardError(error)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverError;

    fn heuristic() -> StatementHeuristic {
        StatementHeuristic::from_config(&ConsoleConfig::default()).unwrap()
    }

    fn syntax(message: &str) -> Result<QueryOutcome> {
        Err(Error::Driver(DriverError::Syntax(message.to_string())))
    }

    #[test]
    fn recognises_leading_keywords_case_insensitively() {
        let h = heuristic();
        assert!(h.looks_like_statement("MATCH (n) RETURN n"));
        assert!(h.looks_like_statement("  match (n)\nRETURN n"));
        assert!(h.looks_like_statement("optional match (n) return n"));
        assert!(h.looks_like_statement("RETURN 1"));
        assert!(h.looks_like_statement("CREATE"));
    }

    #[test]
    fn rejects_non_statements() {
        let h = heuristic();
        assert!(!h.looks_like_statement("hello world"));
        assert!(!h.looks_like_statement("MATCHING (n)"));
        assert!(!h.looks_like_statement("{\"a\": 1}"));
        assert!(!h.looks_like_statement(""));
    }

    #[test]
    fn keyword_list_is_configurable() {
        let h = StatementHeuristic::new(&["PING".to_string()], &[]).unwrap();
        assert!(h.looks_like_statement("ping now"));
        assert!(!h.looks_like_statement("MATCH (n) RETURN n"));

        let none = StatementHeuristic::new(&[], &[]).unwrap();
        assert!(!none.looks_like_statement("MATCH (n) RETURN n"));
    }

    #[test]
    fn both_truncation_phrasings_mean_incomplete() {
        let h = heuristic();
        assert!(matches!(
            h.classify(syntax("Unexpected end of input: expected whitespace, ')' (line 1, column 9)")),
            StatementStatus::Incomplete
        ));
        assert!(matches!(
            h.classify(syntax("Query cannot conclude with MATCH (must be a RETURN clause)")),
            StatementStatus::Incomplete
        ));
    }

    #[test]
    fn phrase_must_lead_the_message() {
        let h = heuristic();
        assert!(!h.is_truncation("Invalid input: Unexpected end of input"));
        assert!(matches!(
            h.classify(syntax("Invalid input 'X': expected 'MATCH'")),
            StatementStatus::HardError(_)
        ));
    }

    #[test]
    fn non_syntax_errors_are_final() {
        let h = heuristic();
        let result = Err(Error::Driver(DriverError::Client {
            code: "Neo.ClientError.Statement.ParameterMissing".to_string(),
            message: "Unexpected end of input".to_string(),
        }));
        assert!(matches!(h.classify(result), StatementStatus::HardError(_)));
        assert!(matches!(h.classify(Err(Error::NotConnected)), StatementStatus::HardError(_)));
    }

    #[test]
    fn success_is_complete() {
        let h = heuristic();
        assert!(matches!(
            h.classify(Ok(QueryOutcome::default())),
            StatementStatus::Complete(_)
        ));
    }
}
