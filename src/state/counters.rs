//! Persisted pending counters
//!
//! One integer per [`PendingCategory`], defaulting to 0 when never written.
//! Writes are immediate and last-write-wins; there is no batching.

use super::preferences::PreferenceDomain;
use crate::models::PendingCategory;
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;

/// Read/write access to the last-observed pending counts
pub trait CounterStore {
    /// Last persisted value, 0 if never written
    fn get(&self, category: PendingCategory) -> u32;

    /// Persist `value` immediately
    fn set(&mut self, category: PendingCategory, value: u32) -> Result<()>;
}

/// Counters kept in the machine-wide preference domain
#[derive(Debug, Clone)]
pub struct PlistCounterStore {
    domain: PreferenceDomain,
}

impl PlistCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            domain: PreferenceDomain::new(path),
        }
    }
}

impl CounterStore for PlistCounterStore {
    fn get(&self, category: PendingCategory) -> u32 {
        self.domain
            .get_integer(category.pref_key())
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0)
    }

    fn set(&mut self, category: PendingCategory, value: u32) -> Result<()> {
        self.domain.set_integer(category.pref_key(), i64::from(value))
    }
}

/// In-process store, for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryCounterStore {
    values: HashMap<PendingCategory, u32>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: PendingCategory, value: u32) -> Self {
        self.values.insert(category, value);
        self
    }
}

impl CounterStore for MemoryCounterStore {
    fn get(&self, category: PendingCategory) -> u32 {
        self.values.get(&category).copied().unwrap_or(0)
    }

    fn set(&mut self, category: PendingCategory, value: u32) -> Result<()> {
        self.values.insert(category, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_plist_store_defaults_to_zero() {
        let temp = TempDir::new().unwrap();
        let store = PlistCounterStore::new(temp.path().join("prefs.plist"));
        for category in PendingCategory::ALL {
            assert_eq!(store.get(category), 0);
        }
    }

    #[test]
    fn test_plist_store_set_then_get() {
        let temp = TempDir::new().unwrap();
        let mut store = PlistCounterStore::new(temp.path().join("prefs.plist"));

        store.set(PendingCategory::Regular, 4).unwrap();
        store.set(PendingCategory::OsUpdates, 2).unwrap();
        assert_eq!(store.get(PendingCategory::Regular), 4);
        assert_eq!(store.get(PendingCategory::OsUpdates), 2);

        // Survives a fresh handle, as the next invocation would see it
        let reopened = PlistCounterStore::new(temp.path().join("prefs.plist"));
        assert_eq!(reopened.get(PendingCategory::Regular), 4);
    }

    #[test]
    fn test_plist_store_negative_value_reads_as_zero() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("prefs.plist");
        PreferenceDomain::new(&path)
            .set_integer(PendingCategory::Regular.pref_key(), -3)
            .unwrap();

        let store = PlistCounterStore::new(&path);
        assert_eq!(store.get(PendingCategory::Regular), 0);
    }

    #[test]
    fn test_memory_store_last_write_wins() {
        let mut store = MemoryCounterStore::new().with(PendingCategory::Regular, 9);
        assert_eq!(store.get(PendingCategory::Regular), 9);
        store.set(PendingCategory::Regular, 1).unwrap();
        store.set(PendingCategory::Regular, 3).unwrap();
        assert_eq!(store.get(PendingCategory::Regular), 3);
        assert_eq!(store.get(PendingCategory::OsUpdates), 0);
    }
}
