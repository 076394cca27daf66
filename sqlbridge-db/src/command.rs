// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Translation of request payloads into SQL commands and parameter binding.

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value as SqlValue};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{SqlCommand, SqlRequest};

impl SqlRequest {
    /// Validate the statement text and normalize the parameter list.
    ///
    /// `arguments` that are absent, `null` or not a list are treated as an
    /// empty parameter list rather than an error.
    pub fn translate(&self) -> Result<SqlCommand> {
        let sql = self.sql.as_deref().ok_or(Error::MissingSql)?;
        if sql.trim().is_empty() {
            return Err(Error::EmptySql);
        }

        let arguments = match &self.arguments {
            Some(Value::Array(arguments)) => arguments.clone(),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                debug!("Ignoring non-list SQL arguments: {other}");
                Vec::new()
            }
        };

        Ok(SqlCommand {
            sql: sql.to_owned(),
            arguments,
        })
    }
}

impl SqlCommand {
    pub fn new(sql: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            arguments,
        }
    }

    pub(crate) fn params(&self) -> impl Iterator<Item = Param<'_>> {
        self.arguments.iter().map(Param)
    }
}

/// Binds a generic value as a positional SQLite parameter.
pub(crate) struct Param<'a>(&'a Value);

impl ToSql for Param<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self.0 {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Integer(i),
                None => match n.as_f64() {
                    Some(f) => SqlValue::Real(f),
                    None => return Err(unsupported(self.0)),
                },
            },
            Value::String(s) => return Ok(ToSqlOutput::from(s.as_str())),
            Value::Array(items) => {
                SqlValue::Blob(blob_bytes(items).ok_or_else(|| unsupported(self.0))?)
            }
            Value::Object(_) => return Err(unsupported(self.0)),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

/// A list of integers in `0..=255` is how clients send binary values.
fn blob_bytes(items: &[Value]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
        .collect()
}

fn unsupported(value: &Value) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(format!("unsupported parameter value: {value}").into())
}
