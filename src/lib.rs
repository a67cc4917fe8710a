//! # taskdb
//!
//! A small record store backing a task-tracking API:
//! - Named collections of semi-structured JSON records
//! - Case-insensitive substring search (OR across fields)
//! - System-managed ids and timestamps
//! - Whole-store JSON file, rewritten after every mutation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Dispatch layer / CLI                         │
//! │                   (Command → Response)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     RecordStore                              │
//! │     select · get · insert · update · delete · complete       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Tables    │ snapshot │  Persister  │
//!   │  (RwLock)   │ ───────► │ (tmp+rename)│
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   db.json   │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod table;
pub mod persist;
pub mod command;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, PersistStrategy};
pub use record::{Fields, Filter, Record};
pub use engine::RecordStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of taskdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
