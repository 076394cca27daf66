// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Session registry and batch execution engine for SQLite databases.
//!
//! This crate owns the open database handles of a bridge process and runs
//! generic, loosely-typed commands against them.
//!
//! # Key Features
//!
//! - Integer handles allocated from a monotonic counter, never reused
//! - "Single instance" opens that reuse the handle already open for a path
//! - Translation of request payloads into parameterized statements
//! - Batches with `noResult` and `continueOnError` policies
//! - Marshaling of rows into a transport-neutral `{columns, rows}` shape
//!
//! # Example
//!
//! ```ignore
//! use sqlbridge_db::{OpenOptions, Registry, SqlRequest};
//! use serde_json::json;
//!
//! let registry = Registry::new();
//! let opened = registry.open(&OpenOptions::new("notes.db").single_instance(true))?;
//! let db = registry.get(opened.id)?;
//! db.execute(&SqlRequest::new("CREATE TABLE t (v)", vec![]).translate()?)?;
//! let id = db.insert(&SqlRequest::new("INSERT INTO t VALUES (?)", vec![json!(42)]).translate()?)?;
//! ```

mod batch;
mod command;
mod database;
mod envelope;
mod error;
mod marshal;
mod registry;
mod types;

pub use database::Database;
pub use envelope::ErrorEnvelope;
pub use error::{
    ERROR_BAD_PARAM, ERROR_DATABASE_CLOSED, ERROR_IO, ERROR_OPEN_FAILED, Error, OpenFailure,
    Result, SQLITE_ERROR,
};
pub use registry::{Registry, delete_database};
pub use types::*;
