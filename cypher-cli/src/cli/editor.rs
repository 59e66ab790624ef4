// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Terminal line editor for the interactive console
//!
//! Wraps a rustyline [`Editor`] behind the console's [`LineEditor`] trait and
//! adds tab completion for slash commands and leading Cypher keywords.

use std::borrow::Cow;
use std::path::Path;

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};

use cypher_console::{ConsoleConfig, Error, LineEditor, ReadOutcome, Registry, Result};

/// Completes `/literal` at the start of a line and Cypher keywords elsewhere
pub struct ConsoleHelper {
    prefix: String,
    commands: Vec<String>,
    keywords: Vec<String>,
}

impl ConsoleHelper {
    pub fn new(config: &ConsoleConfig, registry: &Registry) -> Self {
        Self {
            prefix: config.command_prefix.clone(),
            commands: registry
                .literals()
                .into_iter()
                .map(|literal| format!("{}{}", config.command_prefix, literal))
                .collect(),
            keywords: config
                .statement_keywords
                .iter()
                .map(|keyword| keyword.to_uppercase())
                .collect(),
        }
    }

    /// Start of the word under the cursor and the matching candidates
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let before = &line[..pos];
        let start = before
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &before[start..];

        let first_word = before[..start].trim().is_empty();
        if first_word && !self.prefix.is_empty() && word.starts_with(self.prefix.as_str()) {
            let lowered = word.to_lowercase();
            let matches = self
                .commands
                .iter()
                .filter(|command| command.starts_with(&lowered))
                .cloned()
                .collect();
            return (start, matches);
        }

        if word.is_empty() {
            return (start, Vec::new());
        }
        let upper = word.to_uppercase();
        let mut matches: Vec<String> = self
            .keywords
            .iter()
            .filter(|keyword| keyword.starts_with(&upper))
            .cloned()
            .collect();
        matches.sort();
        matches.dedup();
        (start, matches)
    }
}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(line, pos);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;

    /// Inline hint when exactly one slash command matches
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || !line.starts_with(self.prefix.as_str()) || self.prefix.is_empty() {
            return None;
        }
        let (start, matches) = self.candidates(line, pos);
        if start != 0 {
            return None;
        }
        match matches.as_slice() {
            [only] if only.len() > line.len() => Some(only[line.len()..].to_string()),
            _ => None,
        }
    }
}

impl Highlighter for ConsoleHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for ConsoleHelper {}

impl Helper for ConsoleHelper {}

/// rustyline-backed [`LineEditor`]
pub struct ConsoleEditor {
    editor: Editor<ConsoleHelper, DefaultHistory>,
}

impl ConsoleEditor {
    pub fn new(config: &ConsoleConfig, registry: &Registry) -> Result<Self> {
        let rl_config = Config::builder()
            .edit_mode(EditMode::Emacs)
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .max_history_size(config.history_length)
            .map_err(editor_error)?
            .build();

        let mut editor = Editor::with_config(rl_config).map_err(editor_error)?;
        editor.set_helper(Some(ConsoleHelper::new(config, registry)));
        Ok(Self { editor })
    }
}

fn editor_error(err: ReadlineError) -> Error {
    Error::LineEditor(err.to_string())
}

impl LineEditor for ConsoleEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(editor_error(err)),
        }
    }

    /// Entries are trimmed first: with `history_ignore_space` rustyline skips
    /// lines that start with a space
    fn add_history_entry(&mut self, line: &str) {
        let entry = line.trim();
        if entry.is_empty() {
            return;
        }
        if let Err(e) = self.editor.add_history_entry(entry) {
            log::debug!("History entry not recorded: {}", e);
        }
    }

    fn load_history(&mut self, path: &Path) -> Result<()> {
        self.editor.load_history(path).map_err(editor_error)
    }

    fn save_history(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.editor.save_history(path).map_err(editor_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::History;

    fn helper() -> ConsoleHelper {
        ConsoleHelper::new(&ConsoleConfig::default(), &Registry::builtin().unwrap())
    }

    #[test]
    fn completes_slash_commands_at_line_start() {
        let h = helper();
        let (start, matches) = h.candidates("/co", 3);
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["/commit", "/connect", "/config"]);

        let (_, matches) = h.candidates("/PU", 3);
        assert_eq!(matches, vec!["/push"]);
    }

    #[test]
    fn completes_keywords_case_insensitively() {
        let h = helper();
        let (start, matches) = h.candidates("MATCH (n) ret", 13);
        assert_eq!(start, 10);
        assert_eq!(matches, vec!["RETURN"]);
    }

    #[test]
    fn slash_commands_only_complete_as_first_word() {
        let h = helper();
        let (_, matches) = h.candidates("RETURN /co", 10);
        assert!(matches.is_empty());
    }

    #[test]
    fn nothing_to_complete_after_whitespace() {
        let h = helper();
        let (start, matches) = h.candidates("MATCH ", 6);
        assert_eq!(start, 6);
        assert!(matches.is_empty());
    }

    #[test]
    fn indented_lines_are_kept_in_history() {
        let mut editor =
            ConsoleEditor::new(&ConsoleConfig::default(), &Registry::builtin().unwrap()).unwrap();
        editor.add_history_entry("RETURN 1");
        editor.add_history_entry("  MATCH (n) RETURN n");
        editor.add_history_entry("   ");

        let history = editor.editor.history();
        assert_eq!(history.len(), 2);
        let last = history
            .get(1, rustyline::history::SearchDirection::Forward)
            .unwrap()
            .unwrap();
        assert_eq!(last.entry, "MATCH (n) RETURN n");
    }
}
