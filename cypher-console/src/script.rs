// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Script splitting for `/play`
//!
//! Statements end at `;`. Semicolons inside string literals, backtick
//! identifiers and comments do not split. Comments are dropped; empty
//! statements are skipped.

#[derive(Clone, Copy, PartialEq)]
enum Scan {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

pub fn split_statements(source: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = Scan::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Scan::Code => match c {
                ';' => finish(&mut current, &mut statements),
                '\'' | '"' | '`' => {
                    state = Scan::Quoted(c);
                    current.push(c);
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = Scan::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Scan::BlockComment;
                }
                _ => current.push(c),
            },
            Scan::Quoted(quote) => {
                current.push(c);
                if c == '\\' && quote != '`' {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                } else if c == quote {
                    state = Scan::Code;
                }
            }
            Scan::LineComment => {
                if c == '\n' {
                    current.push('\n');
                    state = Scan::Code;
                }
            }
            Scan::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    current.push(' ');
                    state = Scan::Code;
                }
            }
        }
    }
    finish(&mut current, &mut statements);
    statements
}

fn finish(current: &mut String, statements: &mut Vec<String>) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_semicolons() {
        let script = "CREATE (a:Person {name: 'Alice'});\nMATCH (n) RETURN n;\n";
        assert_eq!(
            split_statements(script),
            vec!["CREATE (a:Person {name: 'Alice'})", "MATCH (n) RETURN n"]
        );
    }

    #[test]
    fn keeps_semicolons_inside_literals() {
        let script = "RETURN 'a;b' AS s; RETURN \"c\\\";d\" AS t; MATCH (`odd;name`) RETURN 1";
        assert_eq!(
            split_statements(script),
            vec![
                "RETURN 'a;b' AS s",
                "RETURN \"c\\\";d\" AS t",
                "MATCH (`odd;name`) RETURN 1"
            ]
        );
    }

    #[test]
    fn drops_comments_and_blank_statements() {
        let script = "// setup; not a statement\nRETURN 1;;\n/* block; comment */ RETURN 2";
        assert_eq!(split_statements(script), vec!["RETURN 1", "RETURN 2"]);
    }

    #[test]
    fn trailing_statement_without_terminator_is_kept() {
        assert_eq!(split_statements("RETURN 1"), vec!["RETURN 1"]);
        assert!(split_statements("  \n ; ").is_empty());
    }
}
