//! Persist Module
//!
//! Mirrors the in-memory tables to a single JSON document on disk.
//!
//! ## Responsibilities
//! - Encode/decode the full store as one self-describing document
//! - Whole-file overwrite via temp file + rename
//! - Optional background writer with a flush barrier
//!
//! ## File Format
//! ```text
//! {
//!   "<collection>": [ { record }, { record }, ... ],
//!   "<collection>": [ ... ]
//! }
//! ```
//!
//! ## Write Path
//! ```text
//! snapshot bytes ──► db.json.tmp ──(fsync)──► rename ──► db.json
//! ```

mod snapshot;
mod writer;
mod background;

pub use snapshot::{decode_snapshot, encode_snapshot, read_snapshot, SnapshotState};
pub use writer::SnapshotWriter;
pub use background::{BackgroundWriter, Persister};
