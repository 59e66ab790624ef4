// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Input classification and dispatch
//!
//! Each physical input line is classified as one of:
//!
//! ```text
//! ┌───────────────┐  blank, empty buffer   ┌──────────────────────────┐
//! │  input line   │ ─────────────────────▶ │ no-op                    │
//! └───────────────┘                        └──────────────────────────┘
//!         │ starts with the command prefix ┌──────────────────────────┐
//!         ├──────────────────────────────▶ │ tokenize, resolve, run   │
//!         │                                └──────────────────────────┘
//!         │ buffer + line looks like Cypher┌──────────────────────────┐
//!         ├──────────────────────────────▶ │ execute as a statement   │
//!         │                                │  complete   → print      │
//!         │                                │  incomplete → keep buffer│
//!         │                                │  hard error → report     │
//!         │ anything else                  └──────────────────────────┘
//!         └──────────────────────────────▶   "Invalid input"
//! ```
//!
//! Every cycle that does not leave the dispatcher accumulating ends with a
//! blank separator line on the output sink.

pub mod heuristic;

use crate::command::{split_command_line, Flow, Registry};
use crate::config::ConsoleConfig;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::format::format_outcome;

pub use heuristic::{StatementHeuristic, StatementStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    EmptyBuffer,
    /// Part of a multi-line statement has been read
    Accumulating,
}

pub struct Dispatcher {
    registry: Registry,
    heuristic: StatementHeuristic,
    buffer: Vec<String>,
}

impl Dispatcher {
    pub fn new(registry: Registry, heuristic: StatementHeuristic) -> Self {
        Self {
            registry,
            heuristic,
            buffer: Vec::new(),
        }
    }

    /// Built-in registry plus heuristics from the configuration
    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        Ok(Self::new(
            Registry::builtin()?,
            StatementHeuristic::from_config(config)?,
        ))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn state(&self) -> DispatchState {
        if self.buffer.is_empty() {
            DispatchState::EmptyBuffer
        } else {
            DispatchState::Accumulating
        }
    }

    /// Lines of the statement being accumulated
    pub fn buffer(&self) -> &[String] {
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Process one input line
    pub fn dispatch(&mut self, env: &mut Environment, line: &str) -> Flow {
        let stripped = line.trim_start();
        if stripped.is_empty() && self.buffer.is_empty() {
            return Flow::Continue;
        }

        let prefix = env.command_prefix().to_string();
        if !prefix.is_empty() {
            if let Some(command_line) = stripped.strip_prefix(prefix.as_str()) {
                let flow = self.run_command(env, command_line);
                if flow == Flow::Continue {
                    env.console().write("");
                }
                return flow;
            }
        }

        self.buffer.push(line.to_string());
        self.run_buffer(env);
        Flow::Continue
    }

    fn run_command(&mut self, env: &mut Environment, command_line: &str) -> Flow {
        let result = split_command_line(command_line)
            .and_then(|tokens| self.registry.resolve(tokens))
            .and_then(|command| {
                log::debug!("Executing {:?}", command);
                command.execute(env, &self.registry)
            });

        match result {
            Ok(flow) => flow,
            Err(error) => {
                log::debug!("Slash command failed: {}", error);
                env.console().write_error(&error.to_string());
                Flow::Continue
            }
        }
    }

    fn run_buffer(&mut self, env: &mut Environment) {
        let joined = self.buffer.join("\n");
        let source = joined.trim_start();

        if !self.heuristic.looks_like_statement(source) {
            self.buffer.clear();
            env.console().write_error(&Error::InvalidInput.to_string());
            env.console().write("");
            return;
        }

        match self.heuristic.classify(env.run_query(source)) {
            StatementStatus::Complete(outcome) => {
                self.buffer.clear();
                env.console().write(&format_outcome(&outcome));
                env.console().write("");
            }
            StatementStatus::Incomplete => {
                log::debug!("Statement incomplete after {} lines", self.buffer.len());
            }
            StatementStatus::HardError(error) => {
                self.buffer.clear();
                env.console().write_error(&error.to_string());
                env.console().write("");
            }
        }
    }
}
