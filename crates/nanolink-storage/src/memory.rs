use async_trait::async_trait;
use jiff::Timestamp;
use nanolink_core::error::{StoreError, StoreResult};
use nanolink_core::{Mapping, MappingStore, ShortCode};
use std::collections::HashMap;
use std::sync::RwLock;

/// All rows and indexes live behind one lock so the dual uniqueness check
/// and the insert commit are a single critical section.
#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    rows: HashMap<u64, Mapping>,
    by_url: HashMap<String, u64>,
    by_code: HashMap<String, u64>,
}

/// In-memory implementation of the [`MappingStore`] trait.
///
/// A single `RwLock` over the row map and both indexes keeps
/// check-then-insert atomic with respect to concurrent creations: readers
/// share the lock, while `insert` and `increment_clicks` take the write
/// guard for their whole critical section.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    /// Creates a new empty store. Ids are assigned from 1 upwards and are
    /// never reused, even after deletion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active mappings.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.rows.len()).unwrap_or(0)
    }

    /// Whether the store holds no mappings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MappingStore for InMemoryStore {
    async fn find_by_url(&self, url: &str) -> StoreResult<Option<Mapping>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner
            .by_url
            .get(url)
            .and_then(|id| inner.rows.get(id))
            .cloned())
    }

    async fn find_by_code(&self, code: &ShortCode) -> StoreResult<Option<Mapping>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner
            .by_code
            .get(code.as_str())
            .and_then(|id| inner.rows.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Mapping>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn insert(&self, url: &str, code: Option<&ShortCode>) -> StoreResult<Mapping> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        // Both uniqueness checks happen before any mutation.
        if inner.by_url.contains_key(url) {
            return Err(StoreError::DuplicateUrl(url.to_string()));
        }
        if let Some(code) = code {
            if inner.by_code.contains_key(code.as_str()) {
                return Err(StoreError::DuplicateCode(code.to_string()));
            }
        }

        inner.next_id += 1;
        let id = inner.next_id;

        let mapping = Mapping {
            id,
            original_url: url.to_string(),
            short_code: code.cloned(),
            created_at: Timestamp::now(),
            clicks: 0,
        };

        inner.by_url.insert(url.to_string(), id);
        if let Some(code) = code {
            inner.by_code.insert(code.as_str().to_string(), id);
        }
        inner.rows.insert(id, mapping.clone());

        Ok(mapping)
    }

    async fn increment_clicks(&self, id: u64) -> StoreResult<u64> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let mapping = inner.rows.get_mut(&id).ok_or(StoreError::UnknownId(id))?;
        mapping.clicks += 1;
        Ok(mapping.clicks)
    }

    async fn delete_by_url(&self, url: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        let Some(id) = inner.by_url.remove(url) else {
            return Ok(false);
        };
        if let Some(mapping) = inner.rows.remove(&id) {
            if let Some(code) = mapping.short_code {
                inner.by_code.remove(code.as_str());
            }
        }

        Ok(true)
    }
}
