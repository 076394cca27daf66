// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Structured `{code, message, data}` failure payloads.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, SQLITE_ERROR};

/// Failure payload sent to clients next to a native error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    /// Always `null` for now; no diagnostics are extracted from the error.
    pub data: Option<Value>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Wrap an execution failure, handing the error back to the caller.
    pub fn build(err: Error) -> (Self, Error) {
        (Self::new(SQLITE_ERROR, err.to_string()), err)
    }

    /// Envelope for any failure, using the error's own wire code.
    pub fn from_error(err: &Error) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl From<ErrorEnvelope> for Value {
    fn from(envelope: ErrorEnvelope) -> Self {
        let mut map = Map::new();
        map.insert("code".to_owned(), Value::String(envelope.code));
        map.insert("message".to_owned(), Value::String(envelope.message));
        map.insert("data".to_owned(), envelope.data.unwrap_or(Value::Null));
        Value::Object(map)
    }
}
