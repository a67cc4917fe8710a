//! Engine Module
//!
//! The record store that coordinates the in-memory tables and the
//! store file.
//!
//! ## Responsibilities
//! - Load the store file on startup (or create it)
//! - Execute select/insert/update/delete/complete
//! - Stamp ids and timestamps
//! - Hand a full snapshot to the persister after every mutation

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::RwLock;

use crate::command::{Command, Response};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::persist::{encode_snapshot, read_snapshot, Persister, SnapshotState, SnapshotWriter};
use crate::record::{Fields, Filter, Record};
use crate::table::Tables;

/// The record store
///
/// ## Concurrency Model
///
/// - **Mutations** (insert/update/delete/complete): take the tables write
///   lock, apply the change to a copy, submit that snapshot, and swap the
///   copy in only once the submit succeeds; snapshots reach the persister
///   in mutation order
/// - **Reads** (select/get): take the read lock and never touch disk
///
/// The store is an owned value; callers share it behind an `Arc` when
/// more than one thread needs it.
pub struct RecordStore {
    /// Store configuration
    config: Config,

    /// Path of the store file
    db_path: PathBuf,

    /// Every collection, in memory
    tables: RwLock<Tables>,

    /// Gets snapshots to disk
    persister: Persister,
}

impl RecordStore {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const DB_FILENAME: &'static str = "db.json";

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create data directory if needed
    /// 2. Load `db.json` if present and readable
    /// 3. Otherwise start empty and write an empty store file
    ///
    /// A present but unparseable file fails with `CorruptState`.
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let db_path = config.data_dir.join(Self::DB_FILENAME);

        let (tables, fresh) = match read_snapshot(&db_path)? {
            SnapshotState::Loaded(tables) => (tables, false),
            SnapshotState::Missing => (Tables::new(), true),
        };

        let writer = SnapshotWriter::new(&db_path, config.sync_on_write);
        let persister = Persister::new(writer, config.persist_strategy)?;

        let store = Self {
            config,
            db_path,
            tables: RwLock::new(tables),
            persister,
        };

        if fresh {
            store.persist(&store.tables.read())?;
            store.persister.flush()?;
            tracing::info!(path = %store.db_path.display(), "created empty store");
        } else {
            let tables = store.tables.read();
            tracing::info!(
                path = %store.db_path.display(),
                collections = tables.collection_names().len(),
                records = tables.total_records(),
                "loaded store"
            );
        }

        Ok(store)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Execute a command
    ///
    /// Routes commands to the matching operation. A missing record comes
    /// back as `Err(StoreError::NotFound)`; use `Response::from_result`
    /// to turn that into a `NotFound` response.
    pub fn execute(&self, command: Command) -> Result<Response> {
        match command {
            Command::Select { collection, filter } => {
                let records = self.select(&collection, filter.as_ref());
                Response::records(&records)
            }
            Command::Get { collection, id } => match self.get(&collection, &id) {
                Some(record) => Response::record(&record),
                None => Err(StoreError::not_found(&collection, &id)),
            },
            Command::Insert { collection, fields } => {
                let record = self.insert(&collection, fields)?;
                Response::created(&record)
            }
            Command::Update { collection, id, fields } => {
                let record = self.update(&collection, &id, fields)?;
                Response::record(&record)
            }
            Command::Delete { collection, id } => {
                self.delete(&collection, &id)?;
                Ok(Response::ok(None))
            }
            Command::Complete { collection, id } => {
                let record = self.complete(&collection, &id)?;
                Response::record(&record)
            }
        }
    }

    /// Records of `collection`, in insertion order
    ///
    /// With a filter, a record is kept when any clause matches its field
    /// case-insensitively. Unknown collections give an empty vector.
    pub fn select(&self, collection: &str, filter: Option<&Filter>) -> Vec<Record> {
        let records = self.tables.read().select(collection, filter);
        tracing::debug!(collection, matched = records.len(), "select");
        records
    }

    /// Point lookup by id
    pub fn get(&self, collection: &str, id: &str) -> Option<Record> {
        self.tables.read().get(collection, id).cloned()
    }

    /// Insert a record with a fresh id and timestamps
    ///
    /// Creates the collection on first use. Caller values for system
    /// fields are discarded.
    pub fn insert(&self, collection: &str, fields: Fields) -> Result<Record> {
        let mut tables = self.tables.write();

        let mut next = tables.clone();
        let record = next.insert(collection, Record::new(fields, Utc::now())).clone();
        self.commit(&mut tables, next)?;

        tracing::debug!(collection, id = %record.id, "insert");
        Ok(record)
    }

    /// Merge `fields` over an existing record and refresh `updated_at`
    pub fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<Record> {
        let mut tables = self.tables.write();

        let mut next = tables.clone();
        let record = next
            .get_mut(collection, id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        record.merge(fields, Utc::now());
        let record = record.clone();

        self.commit(&mut tables, next)?;

        tracing::debug!(collection, id, "update");
        Ok(record)
    }

    /// Remove a record
    pub fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut tables = self.tables.write();

        let mut next = tables.clone();
        next.remove(collection, id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        self.commit(&mut tables, next)?;

        tracing::debug!(collection, id, "delete");
        Ok(())
    }

    /// Stamp `completed_at` (and `updated_at`) on a record
    pub fn complete(&self, collection: &str, id: &str) -> Result<Record> {
        let mut tables = self.tables.write();

        let mut next = tables.clone();
        let record = next
            .get_mut(collection, id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        record.complete(Utc::now());
        let record = record.clone();

        self.commit(&mut tables, next)?;

        tracing::debug!(collection, id, "complete");
        Ok(record)
    }

    /// Wait until every mutation so far is on disk
    ///
    /// A no-op with `PersistStrategy::Immediate`.
    pub fn flush(&self) -> Result<()> {
        self.persister.flush()
    }

    /// Close the store, draining any queued writes
    pub fn close(self) -> Result<()> {
        self.persister.shutdown()
    }

    /// Persist `next`, then make it the live state
    ///
    /// On a failed write the live tables are left untouched.
    fn commit(&self, live: &mut Tables, next: Tables) -> Result<()> {
        self.persist(&next)?;
        *live = next;
        Ok(())
    }

    fn persist(&self, tables: &Tables) -> Result<()> {
        let bytes = encode_snapshot(tables, self.config.pretty)?;
        self.persister.submit(bytes)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the store file path
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Collection names, sorted
    pub fn collections(&self) -> Vec<String> {
        self.tables.read().collection_names()
    }

    /// Number of records in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.tables.read().len(collection)
    }

    /// Number of records in the whole store
    pub fn total_records(&self) -> usize {
        self.tables.read().total_records()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
