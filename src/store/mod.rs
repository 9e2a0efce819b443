//! In-memory report store.
//!
//! A keyed collection of [`ReportRecord`]s plus the known-names index used
//! by browse and autocomplete. The store is cache-only state: it is seeded
//! from bundled samples at startup, grows from remote merges, and dies with
//! the process. Lookups never fail; absence is a normal outcome.

use std::collections::{BTreeSet, HashMap};

use crate::report::ReportRecord;

/// Keyed collection of report records.
///
/// Invariant: every key equals its record's `company_name`, and every key is
/// also present in the known-names index.
#[derive(Debug, Default)]
pub struct ReportStore {
    records: HashMap<String, ReportRecord>,
    known_names: BTreeSet<String>,
}

impl ReportStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record by company name. Always succeeds;
    /// last writer wins, wholesale (no field-level merge).
    pub fn upsert(&mut self, record: ReportRecord) {
        self.known_names.insert(record.company_name.clone());
        self.records.insert(record.company_name.clone(), record);
    }

    /// Upsert each record in supplied order; later duplicates win.
    pub fn merge_all(&mut self, records: impl IntoIterator<Item = ReportRecord>) {
        for record in records {
            self.upsert(record);
        }
    }

    /// Look up a record by exact key. Callers normalize case/whitespace
    /// before querying; a miss is a normal outcome, not an error.
    pub fn get(&self, name: &str) -> Option<&ReportRecord> {
        self.records.get(name)
    }

    /// Whether a record exists for the exact key.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Company names with a stored record, sorted ascending (the canonical
    /// display order).
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.records.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Extend the known-names index with names the source recognizes,
    /// whether or not a report has been fetched for them yet.
    pub fn add_known_names(&mut self, names: impl IntoIterator<Item = String>) {
        self.known_names
            .extend(names.into_iter().filter(|n| !n.trim().is_empty()));
    }

    /// The full autocomplete universe, sorted ascending.
    pub fn known_names(&self) -> Vec<String> {
        self.known_names.iter().cloned().collect()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
