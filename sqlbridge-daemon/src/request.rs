// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Typed method calls accepted by the daemon.
//!
//! Each call arrives as `{"method": "<name>", "arguments": {...}}` and is
//! deserialized into a [`Request`] before anything touches the registry, so
//! argument shape errors are reported as `bad_param` up front.

use serde::Deserialize;
use sqlbridge_db::{Batch, DatabaseId, Error, OpenOptions, SqlRequest};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", content = "arguments", rename_all = "camelCase")]
pub enum Request {
    GetPlatformVersion,
    GetDatabasesPath,
    DebugMode(DebugModeArgs),
    Options(OptionsArgs),
    OpenDatabase(OpenOptions),
    CloseDatabase(DatabaseArgs),
    Insert(StatementArgs),
    Update(StatementArgs),
    Execute(StatementArgs),
    Query(StatementArgs),
    Batch(BatchArgs),
    DatabaseExists(PathArgs),
    DeleteDatabase(PathArgs),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseArgs {
    pub id: DatabaseId,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatementArgs {
    pub id: DatabaseId,
    #[serde(flatten)]
    pub command: SqlRequest,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchArgs {
    pub id: DatabaseId,
    #[serde(flatten)]
    pub batch: Batch,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathArgs {
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugModeArgs {
    #[serde(default)]
    pub debug_mode: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsArgs {
    #[serde(default)]
    pub query_as_map_list: Option<bool>,
}

impl Request {
    /// Parse one wire line.
    pub fn parse(line: &str) -> Result<Self, Error> {
        serde_json::from_str(line).map_err(|e| Error::invalid_arguments(e.to_string()))
    }

    /// Method name as it appears on the wire.
    pub fn method(&self) -> &'static str {
        match self {
            Request::GetPlatformVersion => "getPlatformVersion",
            Request::GetDatabasesPath => "getDatabasesPath",
            Request::DebugMode(_) => "debugMode",
            Request::Options(_) => "options",
            Request::OpenDatabase(_) => "openDatabase",
            Request::CloseDatabase(_) => "closeDatabase",
            Request::Insert(_) => "insert",
            Request::Update(_) => "update",
            Request::Execute(_) => "execute",
            Request::Query(_) => "query",
            Request::Batch(_) => "batch",
            Request::DatabaseExists(_) => "databaseExists",
            Request::DeleteDatabase(_) => "deleteDatabase",
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use sqlbridge_db::{BatchMethod, BatchOperation};

    use super::*;

    #[test]
    fn open_database_defaults() {
        let request =
            Request::parse(r#"{"method":"openDatabase","arguments":{"path":"notes.db"}}"#)
                .unwrap();
        assert_eq!(request, Request::OpenDatabase(OpenOptions::new("notes.db")));
    }

    #[test]
    fn open_database_flags() {
        let request = Request::parse(
            r#"{"method":"openDatabase","arguments":{"path":"a.db","readOnly":true,"singleInstance":true}}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            Request::OpenDatabase(
                OpenOptions::new("a.db")
                    .read_only(true)
                    .single_instance(true)
            )
        );
    }

    #[rstest]
    #[case::no_arguments(r#"{"method":"getDatabasesPath"}"#)]
    #[case::null_arguments(r#"{"method":"getDatabasesPath","arguments":null}"#)]
    fn unit_methods(#[case] line: &str) {
        assert_eq!(Request::parse(line).unwrap(), Request::GetDatabasesPath);
    }

    #[test]
    fn statement_keeps_raw_arguments() {
        let request = Request::parse(
            r#"{"method":"insert","arguments":{"id":1,"sql":"INSERT INTO t VALUES (?)","arguments":"oops"}}"#,
        )
        .unwrap();
        let Request::Insert(args) = request else {
            panic!("expected insert");
        };
        assert_eq!(args.id, DatabaseId(1));
        assert_eq!(args.command.sql.as_deref(), Some("INSERT INTO t VALUES (?)"));
        assert_eq!(args.command.arguments, Some(json!("oops")));
    }

    #[test]
    fn batch_operations() {
        let request = Request::parse(
            &json!({
                "method": "batch",
                "arguments": {
                    "id": 2,
                    "operations": [
                        {"method": "insert", "sql": "INSERT INTO t VALUES (?)", "arguments": [1]},
                        {"method": "query", "sql": "SELECT * FROM t"}
                    ],
                    "continueOnError": true
                }
            })
            .to_string(),
        )
        .unwrap();
        let Request::Batch(args) = request else {
            panic!("expected batch");
        };
        assert_eq!(args.id, DatabaseId(2));
        assert!(args.batch.continue_on_error);
        assert!(!args.batch.no_result);
        assert_eq!(
            args.batch.operations,
            vec![
                BatchOperation::new(
                    BatchMethod::Insert,
                    SqlRequest::new("INSERT INTO t VALUES (?)", vec![json!(1)])
                ),
                BatchOperation::new(
                    BatchMethod::Query,
                    SqlRequest {
                        sql: Some("SELECT * FROM t".into()),
                        arguments: None,
                    }
                ),
            ]
        );
    }

    #[rstest]
    #[case::not_json("openDatabase")]
    #[case::unknown_method(r#"{"method":"vacuum"}"#)]
    #[case::missing_id(r#"{"method":"closeDatabase","arguments":{}}"#)]
    #[case::string_id(r#"{"method":"closeDatabase","arguments":{"id":"1"}}"#)]
    #[case::sql_not_string(r#"{"method":"query","arguments":{"id":1,"sql":5}}"#)]
    #[case::unknown_batch_method(
        r#"{"method":"batch","arguments":{"id":1,"operations":[{"method":"drop","sql":"x"}]}}"#
    )]
    fn invalid_requests(#[case] line: &str) {
        let err = Request::parse(line).unwrap_err();
        assert_eq!(err.code(), "bad_param");
    }
}
