// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cypher Console - session state and input dispatch for an interactive
//! graph database console
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Repl (read-eval loop, prompt, batch)   │
//! └─────────────────────────────────────────┘
//!                  │ one line at a time
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │  Dispatcher                             │
//! │  - slash command → Registry → Command   │
//! │  - Cypher text  → StatementHeuristic    │
//! └─────────────────────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │  Environment                            │
//! │  - connection / transaction             │
//! │  - parameter sets, configuration        │
//! │  - output sink                          │
//! └─────────────────────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │  Driver / Connection (HttpDriver)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - [`environment`] - session state holder
//! - [`command`] - slash commands, registry and tokenizer
//! - [`dispatch`] - input classification and statement heuristics
//! - [`repl`] - interactive and batch drivers
//! - [`driver`] - database driver traits and the HTTP driver
//! - [`output`] - output sinks
//! - [`config`] - console configuration
//! - [`error`] - error types

pub mod command;
pub mod config;
pub mod dispatch;
pub mod driver;
pub mod environment;
pub mod error;
pub mod format;
pub mod output;
pub mod params;
pub mod repl;
pub mod script;

pub use command::{Command, Flow, Registry};
pub use config::ConsoleConfig;
pub use dispatch::{DispatchState, Dispatcher, StatementHeuristic, StatementStatus};
pub use driver::{Connection, Driver, DriverError, HttpDriver, QueryOutcome};
pub use environment::Environment;
pub use error::{Error, Result};
pub use output::{CapturedOutput, ConsoleOutput, Output, OutputLine};
pub use params::ParameterSets;
pub use repl::{LineEditor, ReadOutcome, Repl};
