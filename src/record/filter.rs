//! Search filter
//!
//! A set of `field → term` clauses combined with OR. A clause matches when
//! the field's text contains the term, ignoring case.

use crate::error::{Result, StoreError};

use super::Record;

/// Substring search over record fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// (field name, lowercased term), in insertion order
    clauses: Vec<(String, String)>,
}

impl Filter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause
    pub fn field(mut self, name: impl Into<String>, term: impl AsRef<str>) -> Self {
        self.clauses.push((name.into(), term.as_ref().to_lowercase()));
        self
    }

    /// Parse a `field=term` pair (the term may itself contain `=`)
    pub fn parse_clause(pair: &str) -> Result<(String, String)> {
        match pair.split_once('=') {
            Some((name, term)) if !name.is_empty() => Ok((name.to_string(), term.to_string())),
            _ => Err(StoreError::InvalidCommand(format!(
                "expected field=term, got '{}'",
                pair
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// True when at least one clause matches
    ///
    /// A clause on a field the record lacks (or whose value has no text
    /// form) does not match; it never fails the query.
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses.iter().any(|(name, term)| {
            record
                .field_text(name)
                .is_some_and(|text| text.to_lowercase().contains(term.as_str()))
        })
    }
}

impl<K, V> FromIterator<(K, V)> for Filter
where
    K: Into<String>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Filter::new(), |filter, (name, term)| filter.field(name, term))
    }
}
