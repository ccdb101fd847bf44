use std::sync::{Mutex, MutexGuard};

use super::{CatalogEntry, ModelStore};
use crate::error::{ViewerError, ViewerResult};
use crate::loaders::SceneDocument;
use crate::model_id::ModelId;

/// In-process catalog with the same semantics as the HTTP one.
///
/// Entries keep insertion order; re-submitting an id replaces its document
/// in place.
#[derive(Debug)]
pub struct MemoryModelStore {
    entries: Mutex<Vec<CatalogEntry>>,
    available: Mutex<bool>,
}

impl MemoryModelStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            available: Mutex::new(true),
        }
    }

    pub fn with_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let store = Self::new();
        for entry in entries {
            store.insert(entry);
        }
        store
    }

    /// Simulate the catalog going away; every call fails with `StoreUnavailable`
    pub fn set_available(&self, available: bool) {
        *lock(&self.available) = available;
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, entry: CatalogEntry) {
        let mut entries = lock(&self.entries);
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => existing.scene = entry.scene,
            None => entries.push(entry),
        }
    }

    fn check_available(&self) -> ViewerResult<()> {
        if *lock(&self.available) {
            Ok(())
        } else {
            Err(ViewerError::StoreUnavailable("in-memory store offline".to_string()))
        }
    }
}

impl Default for MemoryModelStore {
    fn default() -> Self {
        Self::new()
    }
}

// Entries are replaced whole, so a poisoned lock still guards consistent data
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ModelStore for MemoryModelStore {
    fn list_all(&self) -> ViewerResult<Vec<ModelId>> {
        self.check_available()?;
        Ok(lock(&self.entries).iter().map(|e| e.id.clone()).collect())
    }

    fn fetch_one(&self, id: &ModelId) -> ViewerResult<SceneDocument> {
        self.check_available()?;
        lock(&self.entries)
            .iter()
            .find(|e| &e.id == id)
            .map(|e| e.scene.clone())
            .ok_or_else(|| ViewerError::NotFound(id.clone()))
    }

    fn submit(&self, id: &ModelId, doc: &SceneDocument) -> ViewerResult<()> {
        self.check_available()?;
        self.insert(CatalogEntry {
            id: id.clone(),
            scene: doc.clone(),
        });
        Ok(())
    }
}
