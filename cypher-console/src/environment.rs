// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session state
//!
//! The [`Environment`] owns everything a console session carries between
//! input lines:
//! - the driver and the active connection (at most one)
//! - the active transaction handle (at most one, only while connected)
//! - the parameter-set stack
//! - the configuration, loaded once
//! - the output sink
//!
//! It is constructed explicitly and handed by reference to the dispatcher and
//! to every command; nothing is global.

use crate::command::Registry;
use crate::config::ConsoleConfig;
use crate::driver::{Connection, Driver, Params, QueryOutcome, ServerDetails, TransactionHandle};
use crate::error::{Error, Result};
use crate::output::Output;
use crate::params::ParameterSets;

pub struct Environment {
    driver: Box<dyn Driver>,
    connection: Option<Box<dyn Connection>>,
    transaction: Option<TransactionHandle>,
    parameter_sets: ParameterSets,
    config: ConsoleConfig,
    interactive: bool,
    output: Box<dyn Output>,
}

impl Environment {
    pub fn new(
        driver: Box<dyn Driver>,
        config: ConsoleConfig,
        output: Box<dyn Output>,
        interactive: bool,
    ) -> Self {
        Self {
            driver,
            connection: None,
            transaction: None,
            parameter_sets: ParameterSets::new(),
            config,
            interactive,
            output,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn command_prefix(&self) -> &str {
        &self.config.command_prefix
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// The output sink every component writes through
    pub fn console(&mut self) -> &mut dyn Output {
        self.output.as_mut()
    }

    /// Open a connection and make it the active one.
    ///
    /// A failed attempt leaves the previous connection in place. On success
    /// an open transaction on the previous connection is rolled back first.
    pub fn connect(&mut self, uri: &str, user: &str, password: &str) -> Result<()> {
        let connection = self.driver.connect(uri, user, password)?;

        if let Some(transaction) = self.transaction.take() {
            if let Some(previous) = self.connection.as_mut() {
                log::info!("Rolling back open transaction before reconnecting");
                if let Err(e) = previous.rollback(transaction) {
                    log::warn!("Rollback on previous connection failed: {}", e);
                }
            }
        }

        log::info!("Connected to {} as {}", connection.uri(), connection.user());
        self.connection = Some(connection);
        Ok(())
    }

    /// Connect with the configured address and credentials
    pub fn connect_default(&mut self) -> Result<()> {
        let ConsoleConfig {
            uri,
            user,
            password,
            ..
        } = self.config.clone();
        self.connect(&uri, &user, &password)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Address and user of the active connection
    pub fn connection_info(&self) -> Option<(&str, &str)> {
        self.connection
            .as_ref()
            .map(|connection| (connection.uri(), connection.user()))
    }

    pub fn has_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    pub fn begin_transaction(&mut self) -> Result<()> {
        if self.transaction.is_some() {
            return Err(Error::AlreadyInTransaction);
        }
        let connection = self.connection.as_mut().ok_or(Error::NotConnected)?;
        self.transaction = Some(connection.begin_transaction()?);
        log::debug!("Transaction started");
        Ok(())
    }

    /// Commit the open transaction. The handle is released even when the
    /// server rejects the commit.
    pub fn commit(&mut self) -> Result<()> {
        let transaction = self.transaction.take().ok_or(Error::NoActiveTransaction)?;
        let connection = self.connection.as_mut().ok_or(Error::NotConnected)?;
        connection.commit(transaction)?;
        log::debug!("Transaction committed");
        Ok(())
    }

    pub fn rollback(&mut self) -> Result<()> {
        let transaction = self.transaction.take().ok_or(Error::NoActiveTransaction)?;
        let connection = self.connection.as_mut().ok_or(Error::NotConnected)?;
        connection.rollback(transaction)?;
        log::debug!("Transaction rolled back");
        Ok(())
    }

    /// Run a statement with the merged parameter sets, inside the open
    /// transaction if there is one
    pub fn run_query(&mut self, statement: &str) -> Result<QueryOutcome> {
        let parameters = self.parameter_sets.merged();
        let connection = self.connection.as_mut().ok_or(Error::NotConnected)?;
        log::debug!(
            "Running statement ({} parameters, in transaction: {})",
            parameters.len(),
            self.transaction.is_some()
        );
        Ok(connection.run(statement, &parameters, self.transaction.as_ref())?)
    }

    pub fn server_details(&mut self) -> Result<ServerDetails> {
        let connection = self.connection.as_mut().ok_or(Error::NotConnected)?;
        Ok(connection.server_details()?)
    }

    pub fn push_parameters(&mut self, set: Params) {
        self.parameter_sets.push(set);
    }

    pub fn clear_parameters(&mut self) {
        self.parameter_sets.clear();
    }

    pub fn parameter_sets(&self) -> &ParameterSets {
        &self.parameter_sets
    }

    /// Write the registry's patterns, grouped by literal, to the help channel
    pub fn print_usage_overview(&mut self, registry: &Registry, topic: Option<&str>) {
        for line in registry.usage_lines(&self.config.command_prefix, topic) {
            self.output.write_help(&line);
        }
    }
}
