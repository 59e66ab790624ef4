// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Rendering of query outcomes, parameter sets and server details

use comfy_table::{presets::UTF8_FULL, Table};
use serde_json::Value;

use crate::driver::{Params, QueryOutcome, ServerDetails};

/// Format a value for a table cell. Strings are shown without quotes.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Table of records (if any columns) followed by a one-line summary
pub fn format_outcome(outcome: &QueryOutcome) -> String {
    let mut sections = Vec::new();

    if !outcome.columns.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(outcome.columns.iter());
        for row in &outcome.rows {
            table.add_row(row.iter().map(format_value));
        }
        sections.push(table.to_string());
    }

    sections.push(format_summary(outcome));
    sections.join("\n")
}

fn format_summary(outcome: &QueryOutcome) -> String {
    if outcome.is_empty() {
        return "(no changes, no records)".to_string();
    }
    let count = outcome.record_count();
    let records = format!("({} record{})", count, if count == 1 { "" } else { "s" });
    if outcome.counters.is_empty() {
        return records;
    }
    let counters: Vec<String> = outcome
        .counters
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect();
    format!("{} {}", records, counters.join(", "))
}

/// One line per parameter set, numbered in push order
pub fn format_parameter_sets(sets: &[Params]) -> String {
    if sets.is_empty() {
        return "No parameter sets".to_string();
    }
    sets.iter()
        .enumerate()
        .map(|(index, set)| format!("{}: {}", index + 1, Value::Object(set.clone())))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_server_details(details: &ServerDetails) -> String {
    let mut lines = vec![
        format!("Kernel version: {}", or_unknown(&details.version)),
        format!("Edition: {}", or_unknown(&details.edition)),
    ];
    for (key, value) in &details.extra {
        lines.push(format!("{}: {}", key, value));
    }
    lines.join("\n")
}

fn or_unknown(text: &str) -> &str {
    if text.is_empty() {
        "unknown"
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_table_and_record_count() {
        let outcome = QueryOutcome {
            columns: vec!["name".to_string(), "age".to_string()],
            rows: vec![
                vec![json!("Alice"), json!(30)],
                vec![json!("Bob"), Value::Null],
            ],
            ..QueryOutcome::default()
        };
        let text = format_outcome(&outcome);

        assert!(text.contains("name"));
        assert!(text.contains("Alice"));
        assert!(!text.contains("\"Alice\""));
        assert!(text.contains("null"));
        assert!(text.ends_with("(2 records)"));
    }

    #[test]
    fn update_only_outcome_shows_counters() {
        let mut outcome = QueryOutcome::default();
        outcome.counters.insert("nodes_created".to_string(), 2);
        outcome.counters.insert("labels_added".to_string(), 2);

        assert_eq!(
            format_outcome(&outcome),
            "(0 records) labels_added: 2, nodes_created: 2"
        );
    }

    #[test]
    fn empty_outcome_says_nothing_happened() {
        assert_eq!(
            format_outcome(&QueryOutcome::default()),
            "(no changes, no records)"
        );

        let no_rows = QueryOutcome {
            columns: vec!["n".to_string()],
            ..QueryOutcome::default()
        };
        assert!(format_outcome(&no_rows).ends_with("(0 records)"));
    }

    #[test]
    fn single_record_is_singular() {
        let outcome = QueryOutcome {
            columns: vec!["x".to_string()],
            rows: vec![vec![json!(1)]],
            ..QueryOutcome::default()
        };
        assert!(format_outcome(&outcome).ends_with("(1 record)"));
    }

    #[test]
    fn parameter_sets_are_numbered() {
        let first = json!({"a": 1}).as_object().cloned().unwrap();
        let second = json!({"a": 2}).as_object().cloned().unwrap();
        assert_eq!(
            format_parameter_sets(&[first, second]),
            "1: {\"a\":1}\n2: {\"a\":2}"
        );
        assert_eq!(format_parameter_sets(&[]), "No parameter sets");
    }

    #[test]
    fn server_details_fill_unknown_fields() {
        let details = ServerDetails {
            version: "5.12.0".to_string(),
            ..ServerDetails::default()
        };
        assert_eq!(
            format_server_details(&details),
            "Kernel version: 5.12.0\nEdition: unknown"
        );
    }
}
