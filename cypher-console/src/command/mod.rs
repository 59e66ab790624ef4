// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Slash commands
//!
//! | Command                            | Effect                                  |
//! |------------------------------------|-----------------------------------------|
//! | `/begin` `/commit` `/rollback`     | Explicit transaction control            |
//! | `/connect`                         | Show the current connection             |
//! | `/connect <uri> [<user> <pass>]`   | (Re)connect                             |
//! | `/play <file>`                     | Run each statement of a Cypher script   |
//! | `/dbms`                            | Server version and edition              |
//! | `/params` `/push <json>` `/clear`  | Parameter-set stack                     |
//! | `/config [<term>]`                 | Show configuration                      |
//! | `/help [<topic>]`                  | Usage overview                          |
//! | `/exit`                            | Leave the console                       |
//!
//! A command is built from its tokens by the [`Registry`], executed once
//! against the [`Environment`] and dropped.

pub mod registry;
pub mod tokenize;

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::format::{format_outcome, format_parameter_sets, format_server_details};
use crate::params::parse_parameter_set;
use crate::script::split_statements;

pub use registry::{Pattern, Registry, RegistryEntry};
pub use tokenize::split_command_line;

const HELP_HEADER: &str = "\
The console accepts both raw Cypher and slash commands and supports
basic auto-completion. Available slash commands are listed below:";

const EPILOGUE: &str = "\
Statements that span several lines are collected until the server accepts
them as complete. Pushed parameter sets are merged and sent with every statement.";

/// What the read-eval loop should do after a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    BeginTransaction,
    CommitTransaction,
    RollbackTransaction,
    ListConnections,
    Connect {
        uri: String,
        /// `None` uses the configured user and password
        credentials: Option<(String, String)>,
    },
    Exit,
    PlayCypher {
        path: PathBuf,
    },
    PrintDbmsDetails,
    ListParameterSets,
    AppendParameterSet {
        json: String,
    },
    ClearParameterSets,
    PrintConfig {
        search_term: Option<String>,
    },
    Help {
        topic: Option<String>,
    },
}

impl Command {
    pub(crate) fn connect(args: Vec<String>) -> Command {
        let mut args = args.into_iter();
        let uri = args.next().unwrap_or_default();
        let credentials = match (args.next(), args.next()) {
            (Some(user), Some(password)) => Some((user, password)),
            _ => None,
        };
        Command::Connect { uri, credentials }
    }

    pub(crate) fn play(args: Vec<String>) -> Command {
        Command::PlayCypher {
            path: PathBuf::from(args.into_iter().next().unwrap_or_default()),
        }
    }

    pub(crate) fn push(args: Vec<String>) -> Command {
        Command::AppendParameterSet {
            json: args.into_iter().next().unwrap_or_default(),
        }
    }

    pub(crate) fn config(args: Vec<String>) -> Command {
        Command::PrintConfig {
            search_term: args.into_iter().next(),
        }
    }

    pub(crate) fn help(args: Vec<String>) -> Command {
        Command::Help {
            topic: args.into_iter().next(),
        }
    }

    pub fn execute(self, env: &mut Environment, registry: &Registry) -> Result<Flow> {
        match self {
            Command::BeginTransaction => env.begin_transaction()?,
            Command::CommitTransaction => env.commit()?,
            Command::RollbackTransaction => env.rollback()?,
            Command::ListConnections => list_connections(env),
            Command::Connect { uri, credentials } => {
                let (user, password) = credentials.unwrap_or_else(|| {
                    (env.config().user.clone(), env.config().password.clone())
                });
                env.connect(&uri, &user, &password)?;
                env.console().write(&format!("Connected to {} as {}", uri, user));
            }
            Command::Exit => return Ok(Flow::Exit),
            Command::PlayCypher { path } => play_cypher(env, path)?,
            Command::PrintDbmsDetails => {
                let details = env.server_details()?;
                env.console().write(&format_server_details(&details));
            }
            Command::ListParameterSets => {
                let text = format_parameter_sets(env.parameter_sets().list());
                env.console().write(&text);
            }
            Command::AppendParameterSet { json } => {
                let set = parse_parameter_set(&json)?;
                env.push_parameters(set);
            }
            Command::ClearParameterSets => env.clear_parameters(),
            Command::PrintConfig { search_term } => print_config(env, search_term.as_deref()),
            Command::Help { topic } => help(env, registry, topic)?,
        }
        Ok(Flow::Continue)
    }
}

fn list_connections(env: &mut Environment) {
    let line = match env.connection_info() {
        Some((uri, user)) => {
            let marker = if env.has_transaction() {
                " (transaction open)"
            } else {
                ""
            };
            format!("* {} as {}{}", uri, user, marker)
        }
        None => "Not connected".to_string(),
    };
    env.console().write(&line);
}

/// Statements run in order; a failing statement is reported as a warning
/// and playback moves on to the next one.
fn play_cypher(env: &mut Environment, path: PathBuf) -> Result<()> {
    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(Error::ScriptNotFound(path)),
        Err(e) => return Err(e.into()),
    };

    let statements = split_statements(&source);
    log::info!("Playing {} statements from {}", statements.len(), path.display());

    let mut failed = 0;
    for (index, statement) in statements.iter().enumerate() {
        match env.run_query(statement) {
            Ok(outcome) => env.console().write(&format_outcome(&outcome)),
            Err(error) => {
                failed += 1;
                env.console()
                    .write_error(&format!("Warning: statement {}: {}", index + 1, error));
            }
        }
    }

    let count = statements.len();
    env.console().write(&format!(
        "Played {} statement{} ({} failed)",
        count,
        if count == 1 { "" } else { "s" },
        failed
    ));
    Ok(())
}

fn print_config(env: &mut Environment, search_term: Option<&str>) {
    let entries = env.config().matching(search_term);
    if entries.is_empty() {
        let term = search_term.unwrap_or_default();
        env.console()
            .write(&format!("No configuration entries match '{}'", term));
        return;
    }
    let width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in entries {
        env.console()
            .write(&format!("{:<width$}  {}", key, value, width = width));
    }
}

fn help(env: &mut Environment, registry: &Registry, topic: Option<String>) -> Result<()> {
    let prefix = env.command_prefix().to_string();
    let topic = topic.map(|topic| {
        let lowered = topic.to_lowercase();
        if !prefix.is_empty() {
            if let Some(stripped) = lowered.strip_prefix(prefix.as_str()) {
                return stripped.to_string();
            }
        }
        lowered
    });

    if let Some(topic) = &topic {
        if !registry.has_literal(topic) {
            return Err(Error::UnknownHelpTopic(topic.clone()));
        }
    } else {
        env.console().write_help(HELP_HEADER);
    }

    env.print_usage_overview(registry, topic.as_deref());
    env.console().write("");
    env.console().write_help(EPILOGUE);
    Ok(())
}
