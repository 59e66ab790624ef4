// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Parameter-set stack

use serde_json::Value;

use crate::driver::Params;
use crate::error::{Error, Result};

/// Ordered stack of parameter sets pushed with `/push`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSets {
    sets: Vec<Params>,
}

impl ParameterSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, set: Params) {
        self.sets.push(set);
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }

    /// Sets in push order
    pub fn list(&self) -> &[Params] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Single mapping sent with a statement; later pushes win on key clashes
    pub fn merged(&self) -> Params {
        let mut merged = Params::new();
        for set in &self.sets {
            for (name, value) in set {
                merged.insert(name.clone(), value.clone());
            }
        }
        merged
    }
}

/// Parse the argument of `/push`, which must be a JSON object literal
pub fn parse_parameter_set(text: &str) -> Result<Params> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::ParametersNotAnObject),
    }
}
