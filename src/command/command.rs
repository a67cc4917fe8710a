//! Command definitions
//!
//! Represents one call onto the store.

use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::record::{Fields, Filter};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Select,
    Get,
    Insert,
    Update,
    Delete,
    Complete,
}

impl CommandType {
    /// True for commands that rewrite the store file
    pub fn is_mutation(&self) -> bool {
        !matches!(self, CommandType::Select | CommandType::Get)
    }
}

/// A parsed command
#[derive(Debug, Clone)]
pub enum Command {
    /// List a collection, optionally filtered
    Select {
        collection: String,
        filter: Option<Filter>,
    },

    /// Fetch one record
    Get { collection: String, id: String },

    /// Create a record
    Insert { collection: String, fields: Fields },

    /// Merge fields into a record
    Update {
        collection: String,
        id: String,
        fields: Fields,
    },

    /// Remove a record
    Delete { collection: String, id: String },

    /// Mark a record completed
    Complete { collection: String, id: String },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Select { .. } => CommandType::Select,
            Command::Get { .. } => CommandType::Get,
            Command::Insert { .. } => CommandType::Insert,
            Command::Update { .. } => CommandType::Update,
            Command::Delete { .. } => CommandType::Delete,
            Command::Complete { .. } => CommandType::Complete,
        }
    }

    /// Collection the command targets
    pub fn collection(&self) -> &str {
        match self {
            Command::Select { collection, .. }
            | Command::Get { collection, .. }
            | Command::Insert { collection, .. }
            | Command::Update { collection, .. }
            | Command::Delete { collection, .. }
            | Command::Complete { collection, .. } => collection,
        }
    }
}

/// Build a field map from `key=value` pairs
///
/// A value that parses as JSON (number, bool, null, quoted string, array,
/// object) is kept as that value; anything else is taken as a plain
/// string.
pub fn parse_fields<I, S>(pairs: I) -> Result<Fields>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fields = Fields::new();

    for pair in pairs {
        let pair = pair.as_ref();
        let (key, raw) = pair
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| {
                StoreError::InvalidCommand(format!("expected key=value, got '{}'", pair))
            })?;

        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        fields.insert(key.to_string(), value);
    }

    Ok(fields)
}
