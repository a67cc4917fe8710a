//! Snapshot codec
//!
//! Converts between `Tables` and the bytes of the store file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::table::Tables;

/// What was found at the store location on startup
#[derive(Debug)]
pub enum SnapshotState {
    /// A parseable store file
    Loaded(Tables),

    /// No file, or a file that could not be read
    Missing,
}

/// Serialize the full store
pub fn encode_snapshot(tables: &Tables, pretty: bool) -> Result<Vec<u8>> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(tables)
    } else {
        serde_json::to_vec(tables)
    };

    encoded.map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Parse store bytes; `path` is only used for the error message
pub fn decode_snapshot(bytes: &[u8], path: &Path) -> Result<Tables> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::CorruptState {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Read the store file at `path`
///
/// A missing or unreadable file is `Missing`; a present file that does
/// not parse is `CorruptState`.
pub fn read_snapshot(path: &Path) -> Result<SnapshotState> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no store file");
            return Ok(SnapshotState::Missing);
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "store file unreadable, starting empty");
            return Ok(SnapshotState::Missing);
        }
    };

    decode_snapshot(&bytes, path).map(SnapshotState::Loaded)
}
