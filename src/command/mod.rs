//! Command Module
//!
//! Value types a dispatch layer uses to drive the store.
//!
//! ## Mapping
//! ```text
//! Command::Select   → RecordStore::select    → Ok       [records]
//! Command::Get      → RecordStore::get       → Ok       record | NotFound
//! Command::Insert   → RecordStore::insert    → Created  record
//! Command::Update   → RecordStore::update    → Ok       record | NotFound
//! Command::Delete   → RecordStore::delete    → Ok       -      | NotFound
//! Command::Complete → RecordStore::complete  → Ok       record | NotFound
//! ```

mod command;
mod response;

pub use command::{parse_fields, Command, CommandType};
pub use response::{Response, Status};
