// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Conversion of query cursors into generic result sets.

use rusqlite::types::ValueRef;
use rusqlite::{Params, Statement};
use serde_json::{Map, Number, Value};

use crate::error::Result;
use crate::types::ResultSet;

impl ResultSet {
    /// Run `stmt` with `params` and collect every row.
    ///
    /// Column and row order are kept exactly as SQLite returns them.
    pub fn from_statement<P: Params>(stmt: &mut Statement<'_>, params: P) -> Result<Self> {
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query(params)?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(to_generic(row.get_ref(idx)?));
            }
            rows.push(values);
        }

        Ok(Self { columns, rows })
    }

    /// Render rows as `[{column: value}]`.
    ///
    /// Duplicate column names keep the value of the last such column.
    pub fn into_map_list(self) -> Vec<Map<String, Value>> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|row| columns.iter().cloned().zip(row).collect())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<ResultSet> for Value {
    fn from(set: ResultSet) -> Self {
        let columns = set.columns.into_iter().map(Value::String).collect();
        let rows = set.rows.into_iter().map(Value::Array).collect();
        let mut map = Map::new();
        map.insert("columns".to_owned(), Value::Array(columns));
        map.insert("rows".to_owned(), Value::Array(rows));
        Value::Object(map)
    }
}

/// Map one SQLite cell onto a generic value.
///
/// BLOBs are rendered as text so that encoders without a binary type can
/// carry them.
pub(crate) fn to_generic(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
