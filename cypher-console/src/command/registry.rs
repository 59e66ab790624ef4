// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Slash-command registry
//!
//! A pattern is a literal keyword followed by a fixed number of placeholder
//! slots. Lookup is structural: the lowercased first token must equal the
//! literal and the token count must equal the pattern length. Patterns that
//! share a literal are told apart by arity alone, so registering two patterns
//! with the same (literal, arity) pair is rejected.

use std::fmt;

use super::Command;
use crate::error::{Error, Result};

/// Builds a command from the tokens following the literal
pub type Constructor = fn(Vec<String>) -> Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    literal: &'static str,
    placeholders: &'static [&'static str],
}

impl Pattern {
    pub const fn new(literal: &'static str, placeholders: &'static [&'static str]) -> Self {
        Self {
            literal,
            placeholders,
        }
    }

    pub fn literal(&self) -> &'static str {
        self.literal
    }

    pub fn placeholders(&self) -> &'static [&'static str] {
        self.placeholders
    }

    /// Number of tokens an invocation must have
    pub fn arity(&self) -> usize {
        1 + self.placeholders.len()
    }

    pub fn matches(&self, tokens: &[String]) -> bool {
        tokens.len() == self.arity() && tokens.first().map(String::as_str) == Some(self.literal)
    }

    pub fn usage(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literal)?;
        for placeholder in self.placeholders {
            write!(f, " <{}>", placeholder)?;
        }
        Ok(())
    }
}

pub struct RegistryEntry {
    pub pattern: Pattern,
    pub summary: &'static str,
    construct: Constructor,
}

#[derive(Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in slash command
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry
            .register(Pattern::new("begin", &[]), "Begin a transaction", |_| {
                Command::BeginTransaction
            })?
            .register(Pattern::new("commit", &[]), "Commit the open transaction", |_| {
                Command::CommitTransaction
            })?
            .register(Pattern::new("rollback", &[]), "Roll back the open transaction", |_| {
                Command::RollbackTransaction
            })?
            .register(Pattern::new("connect", &[]), "Show the current connection", |_| {
                Command::ListConnections
            })?
            .register(
                Pattern::new("connect", &["uri"]),
                "Connect with the configured credentials",
                Command::connect,
            )?
            .register(
                Pattern::new("connect", &["uri", "user", "password"]),
                "Connect with explicit credentials",
                Command::connect,
            )?
            .register(Pattern::new("exit", &[]), "Exit the console", |_| Command::Exit)?
            .register(
                Pattern::new("play", &["file"]),
                "Run every statement in a Cypher script",
                Command::play,
            )?
            .register(Pattern::new("dbms", &[]), "Show server version details", |_| {
                Command::PrintDbmsDetails
            })?
            .register(Pattern::new("params", &[]), "List pushed parameter sets", |_| {
                Command::ListParameterSets
            })?
            .register(
                Pattern::new("push", &["json"]),
                "Push a JSON object of parameters",
                Command::push,
            )?
            .register(Pattern::new("clear", &[]), "Clear all parameter sets", |_| {
                Command::ClearParameterSets
            })?
            .register(Pattern::new("config", &[]), "Show configuration", |_| {
                Command::PrintConfig { search_term: None }
            })?
            .register(
                Pattern::new("config", &["search_term"]),
                "Show configuration keys containing a term",
                Command::config,
            )?
            .register(Pattern::new("help", &[]), "Show this help", |_| Command::Help {
                topic: None,
            })?
            .register(
                Pattern::new("help", &["topic"]),
                "Show help for one command",
                Command::help,
            )?;
        Ok(registry)
    }

    pub fn register(
        &mut self,
        pattern: Pattern,
        summary: &'static str,
        construct: Constructor,
    ) -> Result<&mut Self> {
        let literal = pattern.literal();
        if literal.is_empty() || literal != literal.to_lowercase() || literal.contains(char::is_whitespace) {
            return Err(Error::InvalidPattern(pattern.to_string()));
        }
        if self
            .entries
            .iter()
            .any(|entry| entry.pattern.literal() == literal && entry.pattern.arity() == pattern.arity())
        {
            return Err(Error::DuplicatePattern(pattern.to_string()));
        }
        self.entries.push(RegistryEntry {
            pattern,
            summary,
            construct,
        });
        Ok(self)
    }

    /// Turn slash-command tokens into a command. The first token is matched
    /// case-insensitively; arguments are passed through untouched.
    pub fn resolve(&self, mut tokens: Vec<String>) -> Result<Command> {
        let Some(first) = tokens.first_mut() else {
            return Err(Error::InvalidSlashCommand(String::new()));
        };
        *first = first.to_lowercase();

        match self.entries.iter().find(|entry| entry.pattern.matches(&tokens)) {
            Some(entry) => {
                let args = tokens.split_off(1);
                Ok((entry.construct)(args))
            }
            None => Err(Error::InvalidSlashCommand(tokens.swap_remove(0))),
        }
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn has_literal(&self, literal: &str) -> bool {
        self.entries.iter().any(|entry| entry.pattern.literal() == literal)
    }

    /// Distinct literals in registration order
    pub fn literals(&self) -> Vec<&'static str> {
        let mut literals: Vec<&'static str> = Vec::new();
        for entry in &self.entries {
            if !literals.contains(&entry.pattern.literal()) {
                literals.push(entry.pattern.literal());
            }
        }
        literals
    }

    /// Aligned `usage  summary` lines grouped by literal, shortest pattern
    /// first within a group. `topic` narrows the listing to one literal.
    pub fn usage_lines(&self, prefix: &str, topic: Option<&str>) -> Vec<String> {
        let mut selected: Vec<&RegistryEntry> = Vec::new();
        for literal in self.literals() {
            if topic.map_or(false, |topic| topic != literal) {
                continue;
            }
            let mut group: Vec<&RegistryEntry> = self
                .entries
                .iter()
                .filter(|entry| entry.pattern.literal() == literal)
                .collect();
            group.sort_by_key(|entry| entry.pattern.arity());
            selected.extend(group);
        }

        let usages: Vec<String> = selected.iter().map(|entry| entry.pattern.usage(prefix)).collect();
        let width = usages.iter().map(String::len).max().unwrap_or(0);
        selected
            .iter()
            .zip(usages)
            .map(|(entry, usage)| format!("  {:<width$}  {}", usage, entry.summary, width = width))
            .collect()
    }
}
