// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Reply frames of the line protocol.

use serde::Serialize;
use serde_json::Value;
use sqlbridge_db::{Error, ErrorEnvelope};

/// One reply line: `{"result": ...}` or `{"error": {code, message, data}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reply {
    Result(Value),
    Error(ErrorEnvelope),
}

impl Reply {
    pub fn failure(err: Error) -> Self {
        let envelope = if err.is_engine_failure() {
            ErrorEnvelope::build(err).0
        } else {
            ErrorEnvelope::from_error(&err)
        };
        Reply::Error(envelope)
    }

    /// Serialize as one newline-terminated line.
    pub fn to_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

impl From<Result<Value, Error>> for Reply {
    fn from(result: Result<Value, Error>) -> Self {
        match result {
            Ok(value) => Reply::Result(value),
            Err(err) => Reply::failure(err),
        }
    }
}
