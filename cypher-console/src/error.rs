// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the console engine

use std::path::PathBuf;

use thiserror::Error;

use crate::driver::DriverError;

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the console engine.
///
/// The `Display` form of every variant is the single line written to the
/// error channel of the output sink.
#[derive(Error, Debug)]
pub enum Error {
    /// BEGIN issued while a transaction is open
    #[error("Already in a transaction")]
    AlreadyInTransaction,

    /// COMMIT or ROLLBACK issued without an open transaction
    #[error("No active transaction")]
    NoActiveTransaction,

    /// Operation needs a server connection
    #[error("Not connected to a server")]
    NotConnected,

    /// Slash command whose tokens match no registered pattern
    #[error("Syntax Error: Invalid slash command '{0}'")]
    InvalidSlashCommand(String),

    /// Input that is neither a slash command nor query text
    #[error("Syntax Error: Invalid input")]
    InvalidInput,

    /// Slash command line that cannot be tokenized
    #[error("Syntax Error: {0}")]
    MalformedCommand(String),

    /// Parameter set that is not valid JSON
    #[error("Syntax Error: Invalid JSON parameters: {0}")]
    InvalidParameters(#[from] serde_json::Error),

    /// Parameter set that is valid JSON but not an object
    #[error("Syntax Error: Parameter set must be a JSON object")]
    ParametersNotAnObject,

    /// Script passed to /play does not exist
    #[error("File not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    /// Help requested for a topic with no registered command
    #[error("No help available for '{0}'")]
    UnknownHelpTopic(String),

    /// Two registry patterns share a literal and an arity
    #[error("Duplicate command pattern: {0}")]
    DuplicatePattern(String),

    /// Registry pattern literal that can never match a lowercased token
    #[error("Invalid command pattern: {0}")]
    InvalidPattern(String),

    /// Statement keyword list that does not compile
    #[error("Invalid statement keyword: {0}")]
    InvalidKeyword(#[from] regex::Error),

    /// Line editor failure while reading input
    #[error("Line editor error: {0}")]
    LineEditor(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors raised by the database driver
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl Error {
    /// Server-reported syntax message, if this error carries one
    pub fn syntax_message(&self) -> Option<&str> {
        match self {
            Error::Driver(DriverError::Syntax(message)) => Some(message),
            _ => None,
        }
    }
}
