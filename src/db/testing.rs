//! Scripted executor for tests: every expected statement is listed up front
//! with its canned reply, and calls must arrive in exactly that order.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::query::{BoxError, Executor, TextRow};

enum Reply {
    Affected(u64),
    Rows(Vec<TextRow>),
    Fail(String),
}

struct Expectation {
    sql: String,
    params: Option<Vec<String>>,
    reply: Reply,
}

#[derive(Default)]
pub struct ScriptedExecutor {
    expected: Mutex<VecDeque<Expectation>>,
    seen: Mutex<Vec<String>>,
}

/// Error returned by [`ScriptedExecutor::expect_failure`]
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ScriptedFailure(pub String);

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, expectation: Expectation) -> &Self {
        self.expected.lock().unwrap().push_back(expectation);
        self
    }

    pub fn expect_execute(&self, sql: &str) -> &Self {
        self.push(Expectation {
            sql: sql.to_string(),
            params: None,
            reply: Reply::Affected(0),
        })
    }

    pub fn expect_query(&self, sql: &str, params: &[&str], rows: Vec<(&str, &str)>) -> &Self {
        let rows = rows
            .into_iter()
            .map(|(schema, table)| vec![schema.to_string(), table.to_string()])
            .collect();
        self.push(Expectation {
            sql: sql.to_string(),
            params: Some(params.iter().map(|p| p.to_string()).collect()),
            reply: Reply::Rows(rows),
        })
    }

    pub fn expect_query_rows(&self, sql: &str, rows: Vec<TextRow>) -> &Self {
        self.push(Expectation {
            sql: sql.to_string(),
            params: None,
            reply: Reply::Rows(rows),
        })
    }

    pub fn expect_failure(&self, sql: &str, message: &str) -> &Self {
        self.push(Expectation {
            sql: sql.to_string(),
            params: None,
            reply: Reply::Fail(message.to_string()),
        })
    }

    /// Every statement received so far
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    /// Panics if any expected statement never arrived
    pub fn verify(&self) {
        let remaining: Vec<String> = self
            .expected
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.sql.clone())
            .collect();
        assert!(remaining.is_empty(), "expected statements never ran: {remaining:#?}");
    }

    fn next(&self, sql: &str, params: Option<&[&str]>) -> Reply {
        self.seen.lock().unwrap().push(sql.to_string());
        let expectation = self
            .expected
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected statement: {sql}"));
        assert_eq!(expectation.sql, sql);
        if let (Some(expected), Some(actual)) = (&expectation.params, params) {
            assert_eq!(expected, &actual.iter().map(|p| p.to_string()).collect::<Vec<_>>());
        }
        expectation.reply
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn execute(&self, sql: &str) -> Result<u64, BoxError> {
        match self.next(sql, None) {
            Reply::Affected(n) => Ok(n),
            Reply::Rows(rows) => Ok(rows.len() as u64),
            Reply::Fail(message) => Err(Box::new(ScriptedFailure(message))),
        }
    }

    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<TextRow>, BoxError> {
        match self.next(sql, Some(params)) {
            Reply::Rows(rows) => Ok(rows),
            Reply::Affected(_) => Ok(Vec::new()),
            Reply::Fail(message) => Err(Box::new(ScriptedFailure(message))),
        }
    }
}
