// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Output sinks
//!
//! The engine writes through [`Output`] only. [`ConsoleOutput`] targets the
//! terminal; [`CapturedOutput`] records every line so harnesses can inspect
//! what a session printed.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use colored::Colorize;

/// Three-channel output sink
pub trait Output {
    /// Regular output; an empty string produces a blank line
    fn write(&mut self, text: &str);

    fn write_error(&mut self, text: &str);

    fn write_help(&mut self, text: &str);
}

/// Terminal sink: text and help to stdout, errors in red to stderr
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for ConsoleOutput {
    fn write(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", text);
        let _ = stdout.flush();
    }

    fn write_error(&mut self, text: &str) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", text.red());
        let _ = stderr.flush();
    }

    fn write_help(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", text.bright_black());
        let _ = stdout.flush();
    }
}

/// One line written to a [`CapturedOutput`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Text(String),
    Error(String),
    Help(String),
}

/// In-memory sink. Clones share the same buffer, so a test can keep one
/// handle and give the other to the environment.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    lines: Rc<RefCell<Vec<OutputLine>>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<OutputLine> {
        self.lines.borrow().clone()
    }

    pub fn text(&self) -> Vec<String> {
        self.collect(|line| match line {
            OutputLine::Text(text) => Some(text.clone()),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.collect(|line| match line {
            OutputLine::Error(text) => Some(text.clone()),
            _ => None,
        })
    }

    pub fn help(&self) -> Vec<String> {
        self.collect(|line| match line {
            OutputLine::Help(text) => Some(text.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }

    fn collect(&self, pick: impl Fn(&OutputLine) -> Option<String>) -> Vec<String> {
        self.lines.borrow().iter().filter_map(pick).collect()
    }
}

impl Output for CapturedOutput {
    fn write(&mut self, text: &str) {
        self.lines.borrow_mut().push(OutputLine::Text(text.to_string()));
    }

    fn write_error(&mut self, text: &str) {
        self.lines.borrow_mut().push(OutputLine::Error(text.to_string()));
    }

    fn write_help(&mut self, text: &str) {
        self.lines.borrow_mut().push(OutputLine::Help(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_buffer() {
        let capture = CapturedOutput::new();
        let mut sink = capture.clone();

        sink.write("rows");
        sink.write_error("Syntax Error: Invalid input");
        sink.write_help("usage");

        assert_eq!(capture.text(), vec!["rows"]);
        assert_eq!(capture.errors(), vec!["Syntax Error: Invalid input"]);
        assert_eq!(capture.help(), vec!["usage"]);
        assert_eq!(capture.lines().len(), 3);

        capture.clear();
        assert!(capture.lines().is_empty());
    }
}
