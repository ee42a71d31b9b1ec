//! Request and response messages crossing the worker boundary.

use crate::value::{Params, Value};
use serde::{Deserialize, Serialize};

/// Caller-supplied token matching a response to its request.
pub type RequestId = u64;

/// Inbound message: `{ id, action, dbName, sql?, params? }`.
///
/// `action` stays a free-form string so an unrecognized action is
/// representable and can be echoed back in the error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: RequestId,
    pub action: String,
    pub db_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl Request {
    pub fn open(id: RequestId, db_name: impl Into<String>) -> Self {
        Self {
            id,
            action: "open".to_string(),
            db_name: db_name.into(),
            sql: None,
            params: None,
        }
    }

    pub fn execute(
        id: RequestId,
        db_name: impl Into<String>,
        sql: impl Into<String>,
        params: Option<Params>,
    ) -> Self {
        Self {
            id,
            action: "execute".to_string(),
            db_name: db_name.into(),
            sql: Some(sql.into()),
            params,
        }
    }

    pub fn close(id: RequestId, db_name: impl Into<String>) -> Self {
        Self {
            id,
            action: "close".to_string(),
            db_name: db_name.into(),
            sql: None,
            params: None,
        }
    }
}

/// Rows and columns for one statement, passed through in the engine-native
/// shape. Statements producing no rows contribute no `QueryResult`.
///
/// The row array serializes as `values`, the engine's name for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    #[serde(rename = "values")]
    pub rows: Vec<Vec<Value>>,
}

/// Successful payload of a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// The `"ok"` acknowledgement for `open` and `close`.
    Ok,
    /// Engine results for `execute`.
    Results(Vec<QueryResult>),
}

// Hand-rolled serde: `Ok` is the literal string "ok" and `Results` is the
// bare engine exec array, so the wire shape stays `{ id, result: "ok" }`
// or `{ id, result: [...] }` with no enum tagging in between.
impl Serialize for ExecOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExecOutcome::Ok => serializer.serialize_str("ok"),
            ExecOutcome::Results(results) => results.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ExecOutcome {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Ack(String),
            Results(Vec<QueryResult>),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Ack(ack) if ack == "ok" => Ok(ExecOutcome::Ok),
            Raw::Ack(ack) => Err(serde::de::Error::custom(format!(
                "unexpected acknowledgement {ack:?}, expected \"ok\""
            ))),
            Raw::Results(results) => Ok(ExecOutcome::Results(results)),
        }
    }
}

/// Outbound message: `{ id, result }` or `{ id, error }`, never both.
///
/// Untagged so the serialized form stays flat; the two arms are told
/// apart by their field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Result { id: RequestId, result: ExecOutcome },
    Error { id: RequestId, error: String },
}

impl Response {
    pub fn ok(id: RequestId, result: ExecOutcome) -> Self {
        Response::Result { id, result }
    }

    pub fn failure(id: RequestId, error: impl Into<String>) -> Self {
        Response::Error {
            id,
            error: error.into(),
        }
    }

    /// The correlation id of the originating request.
    pub fn id(&self) -> RequestId {
        match self {
            Response::Result { id, .. } | Response::Error { id, .. } => *id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    /// Error text, if this is an error response.
    pub fn error(&self) -> Option<&str> {
        match self {
            Response::Error { error, .. } => Some(error),
            Response::Result { .. } => None,
        }
    }

    /// Successful payload, if this is a result response.
    pub fn result(&self) -> Option<&ExecOutcome> {
        match self {
            Response::Result { result, .. } => Some(result),
            Response::Error { .. } => None,
        }
    }
}
