// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Sequential execution of batches.
//!
//! Operations run strictly in order on one connection. There is no
//! cross-operation atomicity: whatever ran before a failure stays applied.
//! Clients that need all-or-nothing semantics wrap the batch in
//! `BEGIN`/`COMMIT` operations themselves.

use rusqlite::Connection;
use tracing::debug;

use crate::database::{Database, dispatch};
use crate::envelope::ErrorEnvelope;
use crate::error::Result;
use crate::types::{Batch, OperationResult};

impl Database {
    /// Run every operation of `batch` in order.
    ///
    /// Returns `Ok(None)` when `no_result` is set. A malformed operation
    /// always aborts the batch. An execution failure aborts it unless
    /// `continue_on_error` is set, in which case the failure is recorded as an
    /// [`ErrorEnvelope`] result and the next operation runs.
    pub fn batch(&self, batch: &Batch) -> Result<Option<Vec<OperationResult>>> {
        self.with_connection(|conn| run_batch(conn, batch))
    }
}

fn run_batch(conn: &Connection, batch: &Batch) -> Result<Option<Vec<OperationResult>>> {
    let mut results = Vec::new();

    for (index, operation) in batch.operations.iter().enumerate() {
        let command = operation.command.translate()?;

        match dispatch(conn, operation.method, &command) {
            Ok(value) => {
                if !batch.no_result {
                    results.push(OperationResult::value(value));
                }
            }
            Err(err) if batch.continue_on_error => {
                debug!("Batch operation {index} failed, continuing: {err}");
                let (envelope, _) = ErrorEnvelope::build(err);
                if !batch.no_result {
                    results.push(OperationResult::error(envelope));
                }
            }
            Err(err) => {
                debug!("Batch operation {index} failed, aborting: {err}");
                return Err(err);
            }
        }
    }

    Ok((!batch.no_result).then_some(results))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use super::*;
    use crate::error::Error;
    use crate::types::{BatchMethod, BatchOperation, Outcome, SqlRequest};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v INTEGER UNIQUE)").unwrap();
        conn
    }

    fn op(method: BatchMethod, sql: &str, arguments: Vec<Value>) -> BatchOperation {
        BatchOperation::new(method, SqlRequest::new(sql, arguments))
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn results_per_method() {
        let conn = conn();
        let batch = Batch {
            operations: vec![
                op(BatchMethod::Insert, "INSERT INTO t VALUES (?)", vec![json!(5)]),
                op(BatchMethod::Update, "UPDATE t SET v = v + 1", vec![]),
                op(BatchMethod::Execute, "CREATE TABLE u (x)", vec![]),
                op(BatchMethod::Query, "SELECT v FROM t", vec![]),
            ],
            ..Default::default()
        };

        let results = run_batch(&conn, &batch).unwrap().unwrap();
        let values: Vec<Value> = results
            .into_iter()
            .map(|r| match r.result {
                Outcome::Value(v) => v,
                Outcome::Error(e) => panic!("unexpected error {e:?}"),
            })
            .collect();
        assert_eq!(
            values,
            vec![
                json!(1),
                json!(1),
                Value::Null,
                json!({"columns": ["v"], "rows": [[6]]}),
            ]
        );
    }

    #[test]
    fn execute_runs_whole_script() {
        let conn = conn();
        let batch = Batch {
            operations: vec![op(
                BatchMethod::Execute,
                "INSERT INTO t VALUES (1); INSERT INTO t VALUES (2);",
                vec![],
            )],
            ..Default::default()
        };
        let results = run_batch(&conn, &batch).unwrap().unwrap();
        assert_eq!(results, vec![OperationResult::value(Value::Null)]);
        assert_eq!(count(&conn), 2);
    }

    #[test]
    fn no_result_returns_none() {
        let conn = conn();
        let batch = Batch {
            operations: vec![
                op(BatchMethod::Insert, "INSERT INTO t VALUES (1)", vec![]),
                op(BatchMethod::Insert, "INSERT INTO t VALUES (1)", vec![]),
                op(BatchMethod::Insert, "INSERT INTO t VALUES (2)", vec![]),
            ],
            no_result: true,
            continue_on_error: true,
        };
        assert!(run_batch(&conn, &batch).unwrap().is_none());
        assert_eq!(count(&conn), 2);
    }

    #[test]
    fn malformed_operation_aborts_even_when_continuing() {
        let conn = conn();
        let batch = Batch {
            operations: vec![
                op(BatchMethod::Insert, "INSERT INTO t VALUES (1)", vec![]),
                BatchOperation::new(BatchMethod::Execute, SqlRequest::default()),
                op(BatchMethod::Insert, "INSERT INTO t VALUES (2)", vec![]),
            ],
            continue_on_error: true,
            ..Default::default()
        };
        let err = run_batch(&conn, &batch).unwrap_err();
        assert!(matches!(err, Error::MissingSql));
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn error_results_carry_envelope() {
        let conn = conn();
        let batch = Batch {
            operations: vec![op(BatchMethod::Query, "SELECT * FROM missing", vec![])],
            continue_on_error: true,
            ..Default::default()
        };
        let results = run_batch(&conn, &batch).unwrap().unwrap();
        assert_eq!(results.len(), 1);
        match &results[0].result {
            Outcome::Error(envelope) => {
                assert_eq!(envelope.code, "sqlite_error");
                assert!(envelope.message.contains("no such table"));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn empty_batch() {
        let conn = conn();
        let results = run_batch(&conn, &Batch::default()).unwrap().unwrap();
        assert!(results.is_empty());
    }
}
