//! Record Module
//!
//! A stored entity: caller-supplied fields plus system-managed identity
//! and timestamps.
//!
//! ## Document Shape
//! ```text
//! {
//!   "id":           "<uuid v4>",          system, immutable
//!   ...caller fields...,
//!   "created_at":   "<rfc3339 utc>",      system, immutable
//!   "updated_at":   "<rfc3339 utc>",      system, refreshed on mutation
//!   "completed_at": "<rfc3339 utc>"       system, absent until completed
//! }
//! ```

mod filter;

pub use filter::Filter;

use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Caller-supplied fields of a record
pub type Fields = Map<String, Value>;

/// Field names owned by the store; caller values for these are discarded
pub const RESERVED_FIELDS: [&str; 4] = ["id", "created_at", "updated_at", "completed_at"];

/// A single record inside a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique within the collection, assigned at creation
    pub id: String,

    /// Everything the caller supplied
    #[serde(flatten)]
    pub fields: Fields,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Build a fresh record with a new id and identical creation/update stamps
    pub fn new(fields: Fields, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fields: strip_reserved(fields),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Merge `fields` over the existing ones and refresh `updated_at`
    pub fn merge(&mut self, fields: Fields, now: DateTime<Utc>) {
        for (key, value) in strip_reserved(fields) {
            self.fields.insert(key, value);
        }
        self.touch(now);
    }

    /// Mark completed; `completed_at` equals the refreshed `updated_at`
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.touch(now);
        self.completed_at = Some(self.updated_at);
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Look up a field (system or caller) as searchable text
    ///
    /// Returns `None` when the field is absent or holds a value with no
    /// text form (null, array, object).
    pub fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Borrowed(self.id.as_str())),
            "created_at" => Some(Cow::Owned(format_timestamp(&self.created_at))),
            "updated_at" => Some(Cow::Owned(format_timestamp(&self.updated_at))),
            "completed_at" => self
                .completed_at
                .as_ref()
                .map(|ts| Cow::Owned(format_timestamp(ts))),
            _ => self.fields.get(name).and_then(value_text),
        }
    }

    /// Get a caller field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    // Clock steps backwards must not move updated_at below its previous value
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }
}

fn strip_reserved(mut fields: Fields) -> Fields {
    for key in RESERVED_FIELDS {
        if fields.remove(key).is_some_and(|v| !v.is_null()) {
            tracing::debug!(field = key, "discarding caller value for system field");
        }
    }
    fields
}

fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Same text form serde writes to the store file
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
