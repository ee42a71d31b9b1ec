//! Message-driven SQLite dispatch worker.
//!
//! # Intention
//!
//! - Relay open/execute/close requests to embedded SQLite handles keyed by
//!   database name, answering each request with exactly one id-correlated
//!   response.
//! - Host the dispatcher behind a channel pair, one handler per worker
//!   instance, processing messages sequentially in receipt order.
//!
//! # Architectural Boundaries
//!
//! - Query parsing, execution, and storage belong to the embedded engine;
//!   only routing, parameter binding, and result shaping live here.
//! - No persistence or schema logic; databases are in-memory engine
//!   instances that vanish with their registry entry.

pub mod dispatcher;
pub mod error;
pub mod message;
pub mod value;
pub mod worker;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, WorkerError};
pub use message::{ExecOutcome, QueryResult, Request, RequestId, Response};
pub use value::{Params, Value};
pub use worker::WorkerHandle;
