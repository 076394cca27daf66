// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Statement execution against one open connection.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, params_from_iter};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::types::{BatchMethod, ResultSet, SqlCommand};

/// Cloneable handle to an open connection, obtained from the registry.
///
/// `rusqlite::Connection` is not `Sync`, so calls through clones of the same
/// handle are serialized by a per-connection mutex. Handles for different
/// databases never contend.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: Arc<str>,
}

impl Database {
    pub(crate) fn new(conn: Connection, path: &str) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Arc::from(path),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock leaves SQLite itself consistent.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        f(&self.lock())
    }

    /// Run an INSERT and return the last inserted row id.
    pub fn insert(&self, command: &SqlCommand) -> Result<i64> {
        let conn = self.lock();
        run(&conn, command)?;
        Ok(conn.last_insert_rowid())
    }

    /// Run an UPDATE or DELETE and return the number of affected rows.
    pub fn update(&self, command: &SqlCommand) -> Result<u64> {
        let conn = self.lock();
        run(&conn, command)?;
        Ok(conn.changes())
    }

    /// Run statements whose results are not reported.
    ///
    /// Without arguments, `sql` may hold several statements; they run in
    /// order and stop at the first failure.
    pub fn execute(&self, command: &SqlCommand) -> Result<()> {
        execute(&self.lock(), command)
    }

    /// Run a SELECT and collect its rows.
    pub fn query(&self, command: &SqlCommand) -> Result<ResultSet> {
        query(&self.lock(), command)
    }

    /// Close the connection if this is the last handle to it.
    ///
    /// Returns `Ok(false)` when another clone is still alive; the connection
    /// is then dropped together with that clone.
    pub(crate) fn close(self) -> Result<bool> {
        match Arc::try_unwrap(self.conn) {
            Ok(conn) => {
                let conn = conn.into_inner().unwrap_or_else(PoisonError::into_inner);
                conn.close().map_err(|(_, e)| e)?;
                Ok(true)
            }
            Err(_) => {
                debug!("Database {} still in use, deferring close", self.path);
                Ok(false)
            }
        }
    }
}

/// Execute `command` with `method` semantics on a locked connection.
pub(crate) fn dispatch(
    conn: &Connection,
    method: BatchMethod,
    command: &SqlCommand,
) -> Result<Value> {
    match method {
        BatchMethod::Insert => {
            run(conn, command)?;
            Ok(Value::from(conn.last_insert_rowid()))
        }
        BatchMethod::Update => {
            run(conn, command)?;
            Ok(Value::from(conn.changes()))
        }
        BatchMethod::Execute => {
            execute(conn, command)?;
            Ok(Value::Null)
        }
        BatchMethod::Query => query(conn, command).map(Value::from),
    }
}

/// Prepare, bind and step a statement to completion, discarding any rows.
fn run(conn: &Connection, command: &SqlCommand) -> Result<()> {
    trace_sql(command);
    let mut stmt = conn.prepare(&command.sql)?;
    let mut rows = stmt.query(params_from_iter(command.params()))?;
    while rows.next()?.is_some() {}
    Ok(())
}

fn execute(conn: &Connection, command: &SqlCommand) -> Result<()> {
    if !command.arguments.is_empty() {
        return run(conn, command);
    }
    trace_sql(command);
    conn.execute_batch(&command.sql)?;
    Ok(())
}

fn query(conn: &Connection, command: &SqlCommand) -> Result<ResultSet> {
    trace_sql(command);
    let mut stmt = conn.prepare(&command.sql)?;
    ResultSet::from_statement(&mut stmt, params_from_iter(command.params()))
}

fn trace_sql(command: &SqlCommand) {
    debug!("sql={} args={:?}", command.sql, command.arguments);
}
