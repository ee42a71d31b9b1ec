//! Error types for the dispatch worker.

use thiserror::Error;

/// Failures raised while handling a single request.
///
/// None of these are fatal to the worker: the dispatch boundary converts
/// every variant into an error response and moves on to the next message.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// `execute` against a database name with no registry entry.
    #[error("database {0} not open")]
    NotOpen(String),

    /// Action string outside `open`/`execute`/`close`.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// `execute` request without a `sql` field.
    #[error("execute requires a sql statement")]
    MissingSql,

    /// Anything surfaced by the embedded engine, malformed SQL included.
    #[error(transparent)]
    Engine(#[from] rusqlite::Error),
}

/// Channel-level failures from the worker front-end.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The worker loop has exited and its channels are gone.
    #[error("worker channel closed")]
    Closed,
}
