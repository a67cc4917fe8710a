//! Tables implementation
//!
//! The root of all persisted state: collection name → records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{Filter, Record};

/// Every collection in the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tables {
    collections: BTreeMap<String, Vec<Record>>,
}

impl Tables {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of `collection`, optionally narrowed by `filter`
    ///
    /// Unknown collections yield an empty vector. An empty filter is the
    /// same as no filter.
    pub fn select(&self, collection: &str, filter: Option<&Filter>) -> Vec<Record> {
        let records = self.records(collection);

        match filter {
            Some(filter) if !filter.is_empty() => records
                .iter()
                .filter(|record| filter.matches(record))
                .cloned()
                .collect(),
            _ => records.to_vec(),
        }
    }

    /// Records of `collection` (empty slice if unknown)
    pub fn records(&self, collection: &str) -> &[Record] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find a record by id
    pub fn get(&self, collection: &str, id: &str) -> Option<&Record> {
        self.records(collection).iter().find(|record| record.id == id)
    }

    /// Find a record by id for mutation
    pub fn get_mut(&mut self, collection: &str, id: &str) -> Option<&mut Record> {
        self.collections
            .get_mut(collection)?
            .iter_mut()
            .find(|record| record.id == id)
    }

    /// Append a record, creating the collection on first use
    pub fn insert(&mut self, collection: &str, record: Record) -> &Record {
        let records = self.collections.entry(collection.to_string()).or_default();
        records.push(record);
        &records[records.len() - 1]
    }

    /// Remove a record by id, returning it
    ///
    /// The collection itself stays, even when emptied.
    pub fn remove(&mut self, collection: &str, id: &str) -> Option<Record> {
        let records = self.collections.get_mut(collection)?;
        let index = records.iter().position(|record| record.id == id)?;
        Some(records.remove(index))
    }

    /// Collection names, in name order
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    /// Number of records in `collection`
    pub fn len(&self, collection: &str) -> usize {
        self.records(collection).len()
    }

    /// Number of records across all collections
    pub fn total_records(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    /// True when no collection exists
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
