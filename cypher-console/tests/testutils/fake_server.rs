//! In-memory driver used by the integration tests

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use cypher_console::driver::{
    Connection, Driver, DriverError, DriverResult, Params, QueryOutcome, ServerDetails,
    TransactionHandle,
};
use serde_json::json;

/// A statement the fake server accepted
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub statement: String,
    pub parameters: Params,
    pub transaction: Option<String>,
}

#[derive(Debug, Default)]
pub struct ServerState {
    pub unavailable: bool,
    pub reject_commit: bool,
    pub connects: Vec<(String, String, String)>,
    /// Every statement sent, accepted or not
    pub attempts: Vec<String>,
    pub executed: Vec<Executed>,
    pub begun: Vec<String>,
    pub committed: Vec<String>,
    pub rolled_back: Vec<String>,
    next_transaction: usize,
}

/// Handle to the shared fake server state. Clones observe the same server.
#[derive(Debug, Clone, Default)]
pub struct FakeServer {
    state: Rc<RefCell<ServerState>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn driver(&self) -> Box<dyn Driver> {
        Box::new(self.clone())
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.borrow_mut().unavailable = unavailable;
    }

    pub fn set_reject_commit(&self, reject: bool) {
        self.state.borrow_mut().reject_commit = reject;
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.state.borrow().executed.clone()
    }

    pub fn executed_statements(&self) -> Vec<String> {
        self.executed().into_iter().map(|e| e.statement).collect()
    }

    pub fn attempts(&self) -> Vec<String> {
        self.state.borrow().attempts.clone()
    }

    pub fn connects(&self) -> Vec<(String, String, String)> {
        self.state.borrow().connects.clone()
    }

    pub fn begun(&self) -> Vec<String> {
        self.state.borrow().begun.clone()
    }

    pub fn committed(&self) -> Vec<String> {
        self.state.borrow().committed.clone()
    }

    pub fn rolled_back(&self) -> Vec<String> {
        self.state.borrow().rolled_back.clone()
    }
}

impl Driver for FakeServer {
    fn connect(&self, uri: &str, user: &str, password: &str) -> DriverResult<Box<dyn Connection>> {
        let mut state = self.state.borrow_mut();
        if state.unavailable {
            return Err(DriverError::ServiceUnavailable(format!(
                "Could not reach {}",
                uri
            )));
        }
        state
            .connects
            .push((uri.to_string(), user.to_string(), password.to_string()));
        Ok(Box::new(FakeConnection {
            state: Rc::clone(&self.state),
            uri: uri.to_string(),
            user: user.to_string(),
        }))
    }
}

pub struct FakeConnection {
    state: Rc<RefCell<ServerState>>,
    uri: String,
    user: String,
}

/// Mimics the server's syntax checks closely enough to exercise the
/// continuation heuristics
fn check_syntax(statement: &str) -> DriverResult<()> {
    let opened = statement.matches('(').count();
    let closed = statement.matches(')').count();
    if opened > closed {
        return Err(DriverError::Syntax(format!(
            "Unexpected end of input: expected whitespace or ')' (line 1, column {})",
            statement.len() + 1
        )));
    }

    if statement.contains("BOGUS") {
        return Err(DriverError::Syntax(
            "Invalid input 'BOGUS': expected 'RETURN' (line 1, column 1)".to_string(),
        ));
    }

    let upper = statement.to_uppercase();
    let concludes = ["RETURN", "CREATE", "MERGE", "SET", "DELETE"]
        .iter()
        .any(|clause| upper.contains(clause));
    if upper.trim_start().starts_with("MATCH") && !concludes {
        return Err(DriverError::Syntax(
            "Query cannot conclude with MATCH (must be a RETURN clause, an update clause, \
             a unit subquery call, or a procedure call with no YIELD)"
                .to_string(),
        ));
    }
    Ok(())
}

impl Connection for FakeConnection {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn user(&self) -> &str {
        &self.user
    }

    fn run(
        &mut self,
        statement: &str,
        parameters: &Params,
        transaction: Option<&TransactionHandle>,
    ) -> DriverResult<QueryOutcome> {
        let mut state = self.state.borrow_mut();
        state.attempts.push(statement.to_string());
        check_syntax(statement)?;

        state.executed.push(Executed {
            statement: statement.to_string(),
            parameters: parameters.clone(),
            transaction: transaction.map(|t| t.id().to_string()),
        });

        let mut counters = BTreeMap::new();
        if statement.to_uppercase().contains("CREATE") {
            counters.insert("nodes_created".to_string(), 1);
        }
        Ok(QueryOutcome {
            columns: vec!["n".to_string()],
            rows: vec![vec![json!(1)]],
            counters,
        })
    }

    fn begin_transaction(&mut self) -> DriverResult<TransactionHandle> {
        let mut state = self.state.borrow_mut();
        state.next_transaction += 1;
        let id = format!("tx-{}", state.next_transaction);
        state.begun.push(id.clone());
        Ok(TransactionHandle::new(id))
    }

    fn commit(&mut self, transaction: TransactionHandle) -> DriverResult<()> {
        let mut state = self.state.borrow_mut();
        if state.reject_commit {
            return Err(DriverError::Client {
                code: "Neo.ClientError.Transaction.TransactionNotFound".to_string(),
                message: format!("Unrecognized transaction id {}", transaction.id()),
            });
        }
        state.committed.push(transaction.id().to_string());
        Ok(())
    }

    fn rollback(&mut self, transaction: TransactionHandle) -> DriverResult<()> {
        self.state
            .borrow_mut()
            .rolled_back
            .push(transaction.id().to_string());
        Ok(())
    }

    fn server_details(&mut self) -> DriverResult<ServerDetails> {
        Ok(ServerDetails {
            version: "5.12.0".to_string(),
            edition: "community".to_string(),
            extra: BTreeMap::new(),
        })
    }
}
