// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Request and result types shared by the registry and its callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::ErrorEnvelope;

/// Path that designates a private in-memory database.
///
/// Never persisted, never matched by single-instance lookup, and deleting it
/// is a no-op.
pub const MEMORY_DATABASE_PATH: &str = ":memory:";

/// Opaque handle of an open database.
///
/// Allocated from a monotonic counter starting at 1 and never reused within
/// the lifetime of a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseId(pub i32);

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for DatabaseId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Parameters for [`Registry::open`](crate::Registry::open).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOptions {
    /// Filesystem path, or [`MEMORY_DATABASE_PATH`]
    pub path: String,
    /// Accepted for compatibility; logged and not enforced
    #[serde(default)]
    pub read_only: bool,
    /// Reuse an already open handle for the same path
    #[serde(default)]
    pub single_instance: bool,
}

impl OpenOptions {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn single_instance(mut self, single_instance: bool) -> Self {
        self.single_instance = single_instance;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn is_memory(&self) -> bool {
        self.path == MEMORY_DATABASE_PATH
    }
}

/// Outcome of opening a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpenResult {
    pub id: DatabaseId,
    /// `true` when an existing single-instance handle was returned
    pub recovered: bool,
}

/// Statement part of a request, as received.
///
/// Validation into a [`SqlCommand`] happens in
/// [`SqlRequest::translate`](crate::SqlRequest::translate).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SqlRequest {
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl SqlRequest {
    pub fn new(sql: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            sql: Some(sql.into()),
            arguments: Some(Value::Array(arguments)),
        }
    }
}

/// A validated, parameterized SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlCommand {
    /// Non-blank statement text
    pub sql: String,
    /// Positional parameters in binding order
    pub arguments: Vec<Value>,
}

/// Statement kind of a batch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchMethod {
    Insert,
    Update,
    Execute,
    Query,
}

/// One entry of a [`Batch`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchOperation {
    pub method: BatchMethod,
    #[serde(flatten)]
    pub command: SqlRequest,
}

impl BatchOperation {
    pub fn new(method: BatchMethod, command: SqlRequest) -> Self {
        Self { method, command }
    }
}

/// An ordered list of operations run under one continuation/result policy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub operations: Vec<BatchOperation>,
    /// Do not collect per-operation results
    #[serde(default)]
    pub no_result: bool,
    /// Record execution failures and keep going instead of aborting
    #[serde(default)]
    pub continue_on_error: bool,
}

/// Rows returned by a query, in engine order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Per-operation entry of a batch reply: `{"result": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult {
    pub result: Outcome,
}

/// Value carried by an [`OperationResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Value(Value),
    Error(ErrorEnvelope),
}

impl OperationResult {
    pub fn value(value: Value) -> Self {
        Self {
            result: Outcome::Value(value),
        }
    }

    pub fn error(envelope: ErrorEnvelope) -> Self {
        Self {
            result: Outcome::Error(envelope),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.result, Outcome::Error(_))
    }
}

impl From<OperationResult> for Value {
    fn from(operation: OperationResult) -> Self {
        let result = match operation.result {
            Outcome::Value(value) => value,
            Outcome::Error(envelope) => Value::from(envelope),
        };
        let mut map = serde_json::Map::new();
        map.insert("result".to_owned(), result);
        Value::Object(map)
    }
}
