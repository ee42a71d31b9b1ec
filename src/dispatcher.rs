//! Request dispatch against the session registry.
//!
//! The dispatcher owns the name-to-handle mapping and handles one request
//! at a time. All query execution belongs to the embedded engine; this
//! layer only routes, binds parameters, and shapes results.

use crate::error::DispatchError;
use crate::message::{ExecOutcome, QueryResult, Request, Response};
use crate::value::{strip_param_prefix, Params, Value};
use rusqlite::{Batch, Connection, Statement};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Relays open/execute/close requests to per-name engine handles.
///
/// The registry is an owned field rather than process-global state, so
/// independent dispatcher instances never share databases.
#[derive(Default)]
pub struct Dispatcher {
    registry: HashMap<String, Connection>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one request and produce exactly one response carrying its id.
    ///
    /// This is the single error boundary: any failure, engine errors
    /// included, becomes an error response and leaves the dispatcher able
    /// to serve the next request.
    pub fn dispatch(&mut self, request: Request) -> Response {
        let id = request.id;
        match self.handle(&request) {
            Ok(outcome) => Response::ok(id, outcome),
            Err(err) => {
                warn!(id, action = %request.action, db = %request.db_name, %err, "request failed");
                Response::failure(id, err.to_string())
            }
        }
    }

    fn handle(&mut self, request: &Request) -> Result<ExecOutcome, DispatchError> {
        match request.action.as_str() {
            "open" => {
                self.open(&request.db_name)?;
                Ok(ExecOutcome::Ok)
            }
            "execute" => {
                let sql = request.sql.as_deref().ok_or(DispatchError::MissingSql)?;
                let results = self.execute(&request.db_name, sql, request.params.as_ref())?;
                Ok(ExecOutcome::Results(results))
            }
            "close" => {
                self.close(&request.db_name);
                Ok(ExecOutcome::Ok)
            }
            other => Err(DispatchError::UnknownAction(other.to_string())),
        }
    }

    /// Create an in-memory engine instance on first open for this name.
    /// Opening an already-open name is a no-op.
    pub fn open(&mut self, db_name: &str) -> Result<(), DispatchError> {
        if !self.registry.contains_key(db_name) {
            let conn = Connection::open_in_memory()?;
            self.registry.insert(db_name.to_string(), conn);
            debug!(db = db_name, "opened database");
        }
        Ok(())
    }

    /// Run `sql` against the handle for `db_name` with at most one
    /// parameter-binding set, applied to each statement that declares
    /// parameters. Statements producing no rows contribute no entry to
    /// the result list.
    pub fn execute(
        &self,
        db_name: &str,
        sql: &str,
        params: Option<&Params>,
    ) -> Result<Vec<QueryResult>, DispatchError> {
        let conn = self
            .registry
            .get(db_name)
            .ok_or_else(|| DispatchError::NotOpen(db_name.to_string()))?;
        run_statements(conn, sql, params)
    }

    /// Remove the registry entry, dropping the engine handle with it.
    /// Closing an unknown name is not an error.
    pub fn close(&mut self, db_name: &str) {
        if self.registry.remove(db_name).is_some() {
            debug!(db = db_name, "closed database");
        }
    }

    pub fn is_open(&self, db_name: &str) -> bool {
        self.registry.contains_key(db_name)
    }

    pub fn open_count(&self) -> usize {
        self.registry.len()
    }
}

fn run_statements(
    conn: &Connection,
    sql: &str,
    params: Option<&Params>,
) -> Result<Vec<QueryResult>, DispatchError> {
    let mut results = Vec::new();
    let mut batch = Batch::new(conn, sql);
    while let Some(mut stmt) = batch.next()? {
        let columns: Vec<String> = stmt.column_names().iter().map(|c| (*c).to_string()).collect();
        if stmt.parameter_count() > 0 {
            if let Some(params) = params {
                bind_params(&mut stmt, params)?;
            }
        }
        let mut rows = stmt.raw_query();
        let mut collected: Vec<Vec<Value>> = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                cells.push(Value::from(row.get::<_, rusqlite::types::Value>(idx)?));
            }
            collected.push(cells);
        }
        if !collected.is_empty() {
            results.push(QueryResult {
                columns,
                rows: collected,
            });
        }
    }
    Ok(results)
}

fn bind_params(stmt: &mut Statement<'_>, params: &Params) -> Result<(), DispatchError> {
    let count = stmt.parameter_count();
    match params {
        Params::Positional(values) => {
            for (idx, value) in values.iter().enumerate().take(count) {
                stmt.raw_bind_parameter(idx + 1, value)?;
            }
        }
        Params::Named(map) => {
            // Unmatched placeholders stay unbound, which SQLite reads as NULL.
            let lookup: HashMap<&str, &Value> = map
                .iter()
                .map(|(key, value)| (strip_param_prefix(key), value))
                .collect();
            let names: Vec<Option<String>> = (1..=count)
                .map(|idx| stmt.parameter_name(idx).map(str::to_string))
                .collect();
            for (offset, name) in names.iter().enumerate() {
                if let Some(name) = name {
                    if let Some(value) = lookup.get(strip_param_prefix(name)) {
                        stmt.raw_bind_parameter(offset + 1, *value)?;
                    }
                }
            }
        }
    }
    Ok(())
}
