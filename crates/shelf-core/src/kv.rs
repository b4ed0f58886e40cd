//! Keyed persistent store capability.
//!
//! Session and view state are read and written through [`KeyValueStore`]
//! rather than a global singleton, so the application can inject a
//! file-backed store and tests can inject [`MemoryStore`].

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Context, Result};

use crate::models::{FacetSelection, SortState};

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

pub const APPLIED_KEY: &str = "catalog.applied";
pub const SORT_KEY: &str = "catalog.sort";

/// Applied selection and sort remembered between sessions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub applied: FacetSelection,
    pub sort: SortState,
}

impl ViewState {
    /// Load from `store`; absent keys fall back to defaults.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let applied = match store.get(APPLIED_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Failed to decode stored {}", APPLIED_KEY))?,
            None => FacetSelection::default(),
        };
        let sort = match store.get(SORT_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Failed to decode stored {}", SORT_KEY))?,
            None => SortState::default(),
        };
        Ok(Self { applied, sort })
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(APPLIED_KEY, &serde_json::to_string(&self.applied)?)?;
        store.set(SORT_KEY, &serde_json::to_string(&self.sort)?)?;
        Ok(())
    }

    pub fn clear(store: &dyn KeyValueStore) -> Result<()> {
        store.remove(APPLIED_KEY)?;
        store.remove(SORT_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortField, SortOrder};

    #[test]
    fn test_memory_store_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("redirect").unwrap(), None);
        store.set("redirect", "/products").unwrap();
        assert_eq!(store.get("redirect").unwrap().as_deref(), Some("/products"));
        store.remove("redirect").unwrap();
        assert_eq!(store.get("redirect").unwrap(), None);
    }

    #[test]
    fn test_view_state_round_trip_and_clear() {
        let store = MemoryStore::new();
        assert_eq!(ViewState::load(&store).unwrap(), ViewState::default());

        let mut state = ViewState::default();
        state.applied.price.insert("10만원 - 20만원".to_string());
        state.sort = SortState::new(SortField::Price, SortOrder::Desc);
        state.save(&store).unwrap();
        assert_eq!(ViewState::load(&store).unwrap(), state);

        ViewState::clear(&store).unwrap();
        assert_eq!(ViewState::load(&store).unwrap(), ViewState::default());
    }

    #[test]
    fn test_corrupt_entry_is_an_error() {
        let store = MemoryStore::new();
        store.set(SORT_KEY, "not json").unwrap();
        assert!(ViewState::load(&store).is_err());
    }
}
