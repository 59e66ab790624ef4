// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI argument definitions for the Cypher console

use clap::{Parser, ValueEnum};

use cypher_console::config::{DEFAULT_DATABASE, DEFAULT_PASSWORD, DEFAULT_URI, DEFAULT_USER};
use cypher_console::{ConsoleConfig, Result};

use super::history;

/// Log level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Cypher console - interactive shell for graph databases
#[derive(Parser, Debug)]
#[command(name = "cypher")]
#[command(about = "Interactive Cypher console for Neo4j-compatible graph databases")]
#[command(version)]
pub struct Cli {
    /// Server address
    #[arg(short = 'a', long = "uri", env = "NEO4J_URI", default_value = DEFAULT_URI)]
    pub uri: String,

    /// Username for authentication
    #[arg(short = 'u', long = "user", env = "NEO4J_USER", default_value = DEFAULT_USER)]
    pub user: String,

    /// Password for authentication
    #[arg(
        short = 'p',
        long = "password",
        env = "NEO4J_PASSWORD",
        default_value = DEFAULT_PASSWORD,
        hide_env_values = true
    )]
    pub password: String,

    /// Prompt for the password instead of taking it from the command line
    #[arg(short = 'P', long = "ask-password")]
    pub ask_password: bool,

    /// Database to run statements against
    #[arg(short = 'd', long = "database", env = "NEO4J_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// History file (an empty value disables history)
    #[arg(long = "history-file", value_name = "PATH")]
    pub history_file: Option<String>,

    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Lines to run in batch mode; the console is interactive without any
    #[arg(value_name = "LINES", allow_hyphen_values = true, trailing_var_arg = true)]
    pub lines: Vec<String>,
}

impl Cli {
    pub fn level_filter(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            self.log_level
                .map(LogLevel::to_level_filter)
                .unwrap_or(log::LevelFilter::Warn)
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.lines.is_empty()
    }

    /// Build the console configuration, prompting for the password if asked to
    pub fn console_config(&self) -> Result<ConsoleConfig> {
        let password = if self.ask_password {
            rpassword::prompt_password("Password: ")?
        } else {
            self.password.clone()
        };

        Ok(ConsoleConfig {
            uri: self.uri.clone(),
            user: self.user.clone(),
            password,
            database: self.database.clone(),
            history_file: history::resolve(self.history_file.as_deref()),
            ..ConsoleConfig::default()
        })
    }
}
