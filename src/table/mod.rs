//! Table Module
//!
//! In-memory representation of the whole store.
//!
//! ## Responsibilities
//! - Map collection names to insertion-ordered records
//! - Get-or-empty lookups for reads, get-or-create for inserts
//! - Linear id lookup for mutations
//!
//! ## Data Structure Choice
//! `BTreeMap<String, Vec<Record>>`:
//! - Collection order in the store file is deterministic
//! - Record order inside a collection is insertion order
//! - No secondary indexes; every lookup is a scan

mod tables;

pub use tables::Tables;
