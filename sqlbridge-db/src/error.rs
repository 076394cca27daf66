// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Error types for registry and statement operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::DatabaseId;

/// Result type for registry and statement operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Wire code for failures reported by SQLite itself.
pub const SQLITE_ERROR: &str = "sqlite_error";
/// Wire code for malformed requests.
pub const ERROR_BAD_PARAM: &str = "bad_param";
/// Wire code for failures while opening a database.
pub const ERROR_OPEN_FAILED: &str = "open_failed";
/// Wire code for operations against a handle that is not open.
pub const ERROR_DATABASE_CLOSED: &str = "database_closed";
/// Wire code for filesystem failures outside of opening.
pub const ERROR_IO: &str = "io_error";

/// Errors that can occur while managing or using database handles.
#[derive(Error, Debug)]
pub enum Error {
    /// Request payload is missing a required field or has the wrong shape
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// SQL command has no `sql` field
    #[error("SQL is not set")]
    MissingSql,

    /// SQL command has a blank `sql` field
    #[error("SQL is empty")]
    EmptySql,

    /// No open database for this handle
    #[error("invalid database id {0}")]
    InvalidHandle(DatabaseId),

    /// Handle counter reached its maximum
    #[error("no database ids left to allocate")]
    HandlesExhausted,

    /// Directory creation or connection open failed
    #[error("failed to open database at '{path}': {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: OpenFailure,
    },

    /// SQLite error
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Removing a database file failed
    #[error("failed to delete database at '{path}': {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Underlying cause of [`Error::OpenFailed`].
#[derive(Error, Debug)]
pub enum OpenFailure {
    #[error("could not create directory '{}': {source}", dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Connect(#[from] rusqlite::Error),
}

impl Error {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }

    /// Wire code reported to clients for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArguments(_) | Error::MissingSql | Error::EmptySql => ERROR_BAD_PARAM,
            Error::InvalidHandle(_) => ERROR_DATABASE_CLOSED,
            Error::HandlesExhausted | Error::OpenFailed { .. } => ERROR_OPEN_FAILED,
            Error::Sqlite(_) => SQLITE_ERROR,
            Error::DeleteFailed { .. } => ERROR_IO,
        }
    }

    /// Whether this failure happened while executing SQL, as opposed to a
    /// malformed request or an unknown handle.
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, Error::Sqlite(_))
    }
}
