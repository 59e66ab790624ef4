// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cypher console entry point
//!
//! Without trailing arguments the console is interactive; otherwise each
//! argument is dispatched as one input line and the process exits.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, ConsoleEditor};
use cypher_console::{ConsoleOutput, Dispatcher, Environment, HttpDriver, Repl, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(cli.level_filter())
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.console_config()?;
    let interactive = cli.is_interactive();
    log::debug!(
        "Starting {} console against {}",
        if interactive { "interactive" } else { "batch" },
        config.uri
    );

    let dispatcher = Dispatcher::from_config(&config)?;
    let driver = HttpDriver::new(config.database.clone());
    let mut env = Environment::new(
        Box::new(driver),
        config,
        Box::new(ConsoleOutput::new()),
        interactive,
    );
    env.connect_default()?;

    let mut repl = Repl::new(env, dispatcher);
    repl.run(&cli.lines, ConsoleEditor::new)
}
