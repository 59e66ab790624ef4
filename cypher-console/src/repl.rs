// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! # REPL driver
//!
//! Owns the read-eval loop on top of a [`Dispatcher`] and an
//! [`Environment`]. Two modes:
//!
//! - interactive: read lines from a [`LineEditor`] until `/exit` or EOF,
//!   with history loaded before and saved after the loop
//! - batch: feed a fixed list of lines through the same dispatcher, in
//!   order, then return; nothing is read from the terminal
//!
//! The prompt is `>>>` on a fresh statement and `...` while a statement is
//! being continued. Green means no transaction is open, red means one is.

use std::path::Path;

use colored::{Color, Colorize};

use crate::command::{Flow, Registry};
use crate::config::ConsoleConfig;
use crate::dispatch::{DispatchState, Dispatcher};
use crate::environment::Environment;
use crate::error::Result;

const PRIMARY_PROMPT: &str = ">>>";
const CONTINUATION_PROMPT: &str = "...";

/// One read from the line editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C: drop the statement being accumulated
    Interrupted,
    /// Ctrl-D or end of input
    Eof,
}

/// Line-editing collaborator: blocking reads plus persisted history
pub trait LineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    fn add_history_entry(&mut self, line: &str);

    fn load_history(&mut self, path: &Path) -> Result<()>;

    fn save_history(&mut self, path: &Path) -> Result<()>;
}

pub struct Repl {
    env: Environment,
    dispatcher: Dispatcher,
}

impl Repl {
    pub fn new(env: Environment, dispatcher: Dispatcher) -> Self {
        Self { env, dispatcher }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn prompt_colour(&self) -> Color {
        if self.env.has_transaction() {
            Color::Red
        } else {
            Color::Green
        }
    }

    pub fn prompt(&self) -> String {
        let colour = self.prompt_colour();
        match self.dispatcher.state() {
            DispatchState::EmptyBuffer => format!("{} ", PRIMARY_PROMPT.color(colour).bold()),
            DispatchState::Accumulating => format!("{} ", CONTINUATION_PROMPT.color(colour)),
        }
    }

    /// Run one input line through the dispatcher
    pub fn feed(&mut self, line: &str) -> Flow {
        self.dispatcher.dispatch(&mut self.env, line)
    }

    /// Dispatch each line in order. Stops early on `/exit`; returns the
    /// number of lines dispatched.
    pub fn run_batch<I, S>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cycles = 0;
        for line in lines {
            cycles += 1;
            if self.feed(line.as_ref()) == Flow::Exit {
                log::debug!("Batch stopped by exit after {} lines", cycles);
                return cycles;
            }
        }
        if self.dispatcher.state() == DispatchState::Accumulating {
            log::debug!(
                "Input ended with {} unfinished lines",
                self.dispatcher.buffer().len()
            );
        }
        cycles
    }

    /// Interactive session when the environment is interactive, otherwise a
    /// batch run over `lines`. The editor is only opened for interactive use.
    pub fn run<S, E, F>(&mut self, lines: &[S], open_editor: F) -> Result<()>
    where
        S: AsRef<str>,
        E: LineEditor,
        F: FnOnce(&ConsoleConfig, &Registry) -> Result<E>,
    {
        if self.env.is_interactive() {
            let mut editor = open_editor(self.env.config(), self.dispatcher.registry())?;
            return self.interact(&mut editor);
        }
        let cycles = self.run_batch(lines);
        log::debug!("Batch finished after {} of {} lines", cycles, lines.len());
        Ok(())
    }

    /// Interactive session: banner, history load, read-eval loop, history save
    pub fn interact<E: LineEditor + ?Sized>(&mut self, editor: &mut E) -> Result<()> {
        self.write_welcome();

        let history_file = self.env.config().history_file.clone();
        if let Some(path) = &history_file {
            if let Err(e) = editor.load_history(path) {
                log::debug!("No history loaded from {}: {}", path.display(), e);
            }
        }

        let result = self.read_eval_loop(editor);

        if let Some(path) = &history_file {
            if let Err(e) = editor.save_history(path) {
                log::warn!("Could not save history to {}: {}", path.display(), e);
            }
        }
        result
    }

    fn read_eval_loop<E: LineEditor + ?Sized>(&mut self, editor: &mut E) -> Result<()> {
        loop {
            let prompt = self.prompt();
            match editor.read_line(&prompt)? {
                ReadOutcome::Line(line) => {
                    let entry = line.trim();
                    if !entry.is_empty() {
                        editor.add_history_entry(entry);
                    }
                    if self.feed(&line) == Flow::Exit {
                        return Ok(());
                    }
                }
                ReadOutcome::Interrupted => {
                    if self.dispatcher.state() == DispatchState::Accumulating {
                        log::debug!("Discarding {} buffered lines", self.dispatcher.buffer().len());
                    }
                    self.dispatcher.reset();
                    self.env.console().write("");
                }
                ReadOutcome::Eof => {
                    if self.dispatcher.state() == DispatchState::Accumulating {
                        log::debug!(
                            "Input ended with {} unfinished lines",
                            self.dispatcher.buffer().len()
                        );
                    }
                    self.env.console().write("");
                    return Ok(());
                }
            }
        }
    }

    fn write_welcome(&mut self) {
        let prefix = self.env.command_prefix().to_string();
        let banner = format!(
            "Cypher Console {} ({} {})\n\
             Press [TAB] to auto-complete, type \"{prefix}help\" for more information or type\n\
             \"{prefix}exit\" to exit the console.",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH,
            prefix = prefix,
        );
        self.env.console().write_help(&banner);
        self.env.console().write("");
    }
}
