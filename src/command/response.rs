//! Response definitions
//!
//! Outcome of a command, ready for a dispatch layer to render.

use serde_json::{json, Value};

use crate::error::{Result, StoreError};
use crate::record::Record;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Created,
    NotFound,
    Error,
}

impl Status {
    /// Closest HTTP status code
    pub fn http_code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::NotFound => 404,
            Status::Error => 500,
        }
    }
}

/// A response to send to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (records for reads, error object for failures)
    pub payload: Option<Value>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Value>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// OK with a single record
    pub fn record(record: &Record) -> Result<Self> {
        Ok(Self::ok(Some(to_value(record)?)))
    }

    /// OK with a list of records
    pub fn records(records: &[Record]) -> Result<Self> {
        Ok(Self::ok(Some(to_value(records)?)))
    }

    /// CREATED with the new record
    pub fn created(record: &Record) -> Result<Self> {
        Ok(Self {
            status: Status::Created,
            payload: Some(to_value(record)?),
        })
    }

    /// Create a NOT_FOUND response
    pub fn not_found(message: &str) -> Self {
        Self {
            status: Status::NotFound,
            payload: Some(json!({ "error": message })),
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(json!({ "error": message })),
        }
    }

    /// Fold an `execute` result into a response
    pub fn from_result(result: Result<Response>) -> Self {
        match result {
            Ok(response) => response,
            Err(e @ StoreError::NotFound { .. }) => Self::not_found(&e.to_string()),
            Err(e) => Self::error(&e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Status::Ok | Status::Created)
    }
}

fn to_value<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
}
