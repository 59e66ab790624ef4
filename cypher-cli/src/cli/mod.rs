// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for the Cypher console
//!
//! Provides argument parsing, history location and the terminal line
//! editor used by the interactive console.

pub mod commands;
pub mod editor;
pub mod history;

pub use commands::Cli;
pub use editor::ConsoleEditor;
