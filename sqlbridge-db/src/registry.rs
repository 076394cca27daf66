// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Ownership of open database handles.
//!
//! A [`Registry`] maps handles to open connections and the paths they were
//! opened against. Every read and write of that map happens under a single
//! mutex. The mutex is never held while SQL runs: callers get a cloned
//! [`Database`] from [`Registry::get`] and execute against it after the lock
//! is released.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::database::Database;
use crate::error::{Error, OpenFailure, Result};
use crate::types::{DatabaseId, MEMORY_DATABASE_PATH, OpenOptions, OpenResult};

struct Entry {
    path: String,
    database: Database,
}

struct State {
    last_id: i32,
    entries: HashMap<DatabaseId, Entry>,
}

/// Registry of open databases.
pub struct Registry {
    state: Mutex<State>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                last_id: 0,
                entries: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Bookkeeping is updated atomically under the lock, so a poisoned
        // guard still holds a consistent map.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a database, or return the open handle for its path when
    /// `single_instance` is requested.
    ///
    /// The connection is opened without holding the registry lock. Two
    /// concurrent single-instance opens of one path still yield one handle:
    /// the path is checked again before registering, and the later opener
    /// drops its connection and recovers the registered handle.
    pub fn open(&self, options: &OpenOptions) -> Result<OpenResult> {
        if options.read_only {
            warn!("Read-only mode is not supported, opening {} read-write", options.path);
        }

        if options.single_instance {
            if let Some(id) = self.find_by_path(&options.path) {
                return Ok(recovered(id, &options.path));
            }
        }

        let conn = connect(&options.path).map_err(|source| Error::OpenFailed {
            path: options.path.clone(),
            source,
        })?;

        let mut state = self.lock();

        if options.single_instance {
            if let Some(id) = find_by_path(&state, &options.path) {
                drop(state);
                debug!("Lost open race for {}, discarding connection", options.path);
                if let Err((_, e)) = conn.close() {
                    warn!("Failed to close duplicate connection to {}: {e}", options.path);
                }
                return Ok(recovered(id, &options.path));
            }
        }

        let id = state
            .last_id
            .checked_add(1)
            .map(DatabaseId)
            .ok_or(Error::HandlesExhausted)?;
        state.last_id = id.0;
        state.entries.insert(
            id,
            Entry {
                path: options.path.clone(),
                database: Database::new(conn, &options.path),
            },
        );
        debug!("Opened database {id} at {}", options.path);

        Ok(OpenResult {
            id,
            recovered: false,
        })
    }

    /// Look up the database for `id`.
    pub fn get(&self, id: DatabaseId) -> Result<Database> {
        self.lock()
            .entries
            .get(&id)
            .map(|entry| entry.database.clone())
            .ok_or(Error::InvalidHandle(id))
    }

    /// Close the database for `id`.
    ///
    /// The handle is unregistered even if closing the connection fails; the
    /// close error is still returned.
    pub fn close(&self, id: DatabaseId) -> Result<()> {
        let entry = self
            .lock()
            .entries
            .remove(&id)
            .ok_or(Error::InvalidHandle(id))?;
        debug!("Closing database {id} at {}", entry.path);
        entry.database.close()?;
        Ok(())
    }

    /// Handle of the open database for `path`, if any.
    ///
    /// The in-memory path never matches: every in-memory open is its own
    /// database.
    pub fn find_by_path(&self, path: &str) -> Option<DatabaseId> {
        find_by_path(&self.lock(), path)
    }

    /// Number of open databases.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close every open database, logging failures.
    pub fn close_all(&self) {
        let entries: Vec<_> = self.lock().entries.drain().collect();
        for (id, entry) in entries {
            if let Err(e) = entry.database.close() {
                warn!("Failed to close database {id} at {}: {e}", entry.path);
            }
        }
    }
}

/// Remove the database file at `path`.
///
/// Deleting the in-memory path is a no-op. Open handles for `path` are left
/// untouched.
pub fn delete_database(path: &str) -> Result<()> {
    if path == MEMORY_DATABASE_PATH {
        return Ok(());
    }
    std::fs::remove_file(path).map_err(|source| Error::DeleteFailed {
        path: path.into(),
        source,
    })?;
    debug!("Deleted database at {path}");
    Ok(())
}

fn recovered(id: DatabaseId, path: &str) -> OpenResult {
    debug!("Recovered database {id} for {path}");
    OpenResult {
        id,
        recovered: true,
    }
}

fn find_by_path(state: &State, path: &str) -> Option<DatabaseId> {
    if path == MEMORY_DATABASE_PATH {
        return None;
    }
    state
        .entries
        .iter()
        .find(|(_, entry)| entry.path == path)
        .map(|(id, _)| *id)
}

fn connect(path: &str) -> std::result::Result<Connection, OpenFailure> {
    if path == MEMORY_DATABASE_PATH {
        return Ok(Connection::open_in_memory()?);
    }

    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| OpenFailure::CreateDir {
            dir: dir.to_owned(),
            source,
        })?;
    }

    Ok(Connection::open(path)?)
}
