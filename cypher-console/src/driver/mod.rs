// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Database driver boundary
//!
//! The console never speaks a wire protocol itself. Everything it needs from
//! the server goes through the [`Driver`] and [`Connection`] traits:
//!
//! - opening a connection (`Driver::connect`)
//! - running a statement with parameters, optionally inside a transaction
//! - explicit transaction control (begin / commit / rollback)
//! - server metadata for `/dbms`
//!
//! Calls are synchronous from the caller's point of view. [`http::HttpDriver`]
//! is the bundled implementation.

pub mod http;

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

pub use http::HttpDriver;

/// Parameters sent alongside a statement
pub type Params = serde_json::Map<String, Value>;

/// Result type alias for driver operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Errors raised by a driver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// The server could not be reached at all
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The server rejected the statement text
    #[error("Syntax Error: {0}")]
    Syntax(String),

    /// Any other error reported by the server
    #[error("{code}: {message}")]
    Client { code: String, message: String },

    /// Request could not be completed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with something the driver does not understand
    #[error("Unexpected server response: {0}")]
    Protocol(String),
}

/// Opaque handle to a server-side transaction.
///
/// Handles are not `Clone`: committing or rolling back consumes the handle,
/// so a transaction is finalised at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct TransactionHandle {
    id: String,
}

impl TransactionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Records and counters produced by one statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Non-zero update counters, keyed by counter name
    pub counters: BTreeMap<String, i64>,
}

impl QueryOutcome {
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty() && self.counters.is_empty()
    }
}

/// Server version metadata shown by `/dbms`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerDetails {
    pub version: String,
    pub edition: String,
    /// Any further string-valued metadata the server advertises
    pub extra: BTreeMap<String, String>,
}

/// Entry point of a driver: turns an address and credentials into a connection
pub trait Driver {
    fn connect(&self, uri: &str, user: &str, password: &str) -> DriverResult<Box<dyn Connection>>;
}

/// An open connection to a database server
pub trait Connection {
    /// Address the connection was opened against
    fn uri(&self) -> &str;

    /// User the connection authenticates as
    fn user(&self) -> &str;

    /// Run a statement, inside `transaction` when given, otherwise auto-committed
    fn run(
        &mut self,
        statement: &str,
        parameters: &Params,
        transaction: Option<&TransactionHandle>,
    ) -> DriverResult<QueryOutcome>;

    fn begin_transaction(&mut self) -> DriverResult<TransactionHandle>;

    fn commit(&mut self, transaction: TransactionHandle) -> DriverResult<()>;

    fn rollback(&mut self, transaction: TransactionHandle) -> DriverResult<()>;

    fn server_details(&mut self) -> DriverResult<ServerDetails>;
}
