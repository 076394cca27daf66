// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Routing of typed requests to the registry.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Value, json};
use sqlbridge_db::{
    Database, DatabaseId, Error, Registry, Result, SqlCommand, SqlRequest, delete_database,
};
use tracing::{debug, info, warn};

use crate::request::{BatchArgs, DebugModeArgs, OptionsArgs, Request, StatementArgs};

struct Inner {
    registry: Registry,
    databases_path: PathBuf,
    debug: AtomicBool,
    query_as_map_list: AtomicBool,
}

/// Dispatches requests against one shared [`Registry`].
///
/// Cheap to clone; every clone sees the same open databases.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<Inner>,
}

impl Handler {
    pub fn new(databases_path: PathBuf) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Registry::new(),
                databases_path,
                debug: AtomicBool::new(false),
                query_as_map_list: AtomicBool::new(false),
            }),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn databases_path(&self) -> &PathBuf {
        &self.inner.databases_path
    }

    pub fn set_debug(&self, enabled: bool) {
        self.inner.debug.store(enabled, Ordering::Relaxed);
    }

    pub fn is_debug(&self) -> bool {
        self.inner.debug.load(Ordering::Relaxed)
    }

    /// Run one request to completion.
    ///
    /// Blocks the calling thread while SQL executes.
    pub fn handle(&self, request: Request) -> Result<Value> {
        debug!("Handling {}", request.method());
        match request {
            Request::GetPlatformVersion => Ok(Value::from(platform_version())),
            Request::GetDatabasesPath => Ok(Value::from(
                self.inner.databases_path.to_string_lossy().into_owned(),
            )),
            Request::DebugMode(args) => {
                self.debug_mode(args);
                Ok(Value::Null)
            }
            Request::Options(args) => {
                self.options(args);
                Ok(Value::Null)
            }
            Request::OpenDatabase(options) => {
                if options.path.is_empty() {
                    return Err(Error::invalid_arguments("database path is empty"));
                }
                let opened = self.inner.registry.open(&options)?;
                Ok(json!({"id": opened.id, "recovered": opened.recovered}))
            }
            Request::CloseDatabase(args) => {
                self.inner.registry.close(args.id)?;
                Ok(Value::Null)
            }
            Request::Insert(args) => {
                let (db, command) = self.statement(&args)?;
                Ok(Value::from(db.insert(&command)?))
            }
            Request::Update(args) => {
                let (db, command) = self.statement(&args)?;
                Ok(Value::from(db.update(&command)?))
            }
            Request::Execute(args) => {
                let (db, command) = self.statement(&args)?;
                db.execute(&command)?;
                Ok(Value::Null)
            }
            Request::Query(args) => {
                let (db, command) = self.statement(&args)?;
                let set = db.query(&command)?;
                if self.inner.query_as_map_list.load(Ordering::Relaxed) {
                    Ok(Value::from(set.into_map_list()))
                } else {
                    Ok(Value::from(set))
                }
            }
            Request::Batch(args) => self.batch(args),
            // Existence is not checked; clients open with create semantics.
            Request::DatabaseExists(_) => Ok(Value::Bool(false)),
            Request::DeleteDatabase(args) => {
                delete_database(&args.path)?;
                Ok(Value::Null)
            }
        }
    }

    fn statement(&self, args: &StatementArgs) -> Result<(Database, SqlCommand)> {
        let db = self.inner.registry.get(args.id)?;
        let command = translate(&args.command, args.id, self.is_debug())?;
        Ok((db, command))
    }

    fn batch(&self, args: BatchArgs) -> Result<Value> {
        let db = self.inner.registry.get(args.id)?;
        if self.is_debug() {
            info!(
                "batch on database {}: {} operations, noResult={}, continueOnError={}",
                args.id,
                args.batch.operations.len(),
                args.batch.no_result,
                args.batch.continue_on_error
            );
        }
        let results = db.batch(&args.batch)?;
        Ok(results
            .map(|results| Value::Array(results.into_iter().map(Value::from).collect()))
            .unwrap_or(Value::Null))
    }

    fn debug_mode(&self, args: DebugModeArgs) {
        if let Some(enabled) = args.debug_mode {
            info!("Debug mode {}", if enabled { "enabled" } else { "disabled" });
            self.set_debug(enabled);
        }
    }

    fn options(&self, args: OptionsArgs) {
        if let Some(as_map_list) = args.query_as_map_list {
            self.inner
                .query_as_map_list
                .store(as_map_list, Ordering::Relaxed);
        }
    }
}

fn translate(request: &SqlRequest, id: DatabaseId, verbose: bool) -> Result<SqlCommand> {
    let command = request
        .translate()
        .inspect_err(|e| warn!("Rejected statement for database {id}: {e}"))?;
    if verbose {
        info!("database {id}: sql={} args={:?}", command.sql, command.arguments);
    }
    Ok(command)
}

fn platform_version() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}
