//! Shared test utilities for console integration tests
//!
//! - `fake_server`: an in-memory [`Driver`](cypher_console::Driver) with a
//!   tiny syntax checker that mimics the server's truncation messages
//! - `session`: helpers that wire a fake server, captured output and a
//!   dispatcher into a ready-to-use session

#![allow(dead_code)]

pub mod fake_server;
pub mod session;
