use std::{
    borrow::Borrow,
    collections::{hash_map::Entry, HashMap},
    hash::Hash,
};
use tokio::sync::RwLock;

use crate::errors::StoreError;

/// Generic in-memory keyed map guarded by a reader/writer lock.
///
/// Readers (`get`, `list`) share the lock; `insert_new` takes it exclusively,
/// so the existence check and the insert happen in one critical section.
/// Values are cloned out, so callers never observe a half-written entry.
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self { inner: RwLock::new(HashMap::new()) }
    }
}

impl<K, V> InMemoryStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key` unless the key is already taken.
    /// An existing entry is never overwritten.
    pub async fn insert_new(&self, key: K, value: V) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        match map.entry(key) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Get value by key.
    pub async fn get<Q>(&self, key: &Q) -> Result<V, StoreError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let map = self.inner.read().await;
        map.get(key).cloned().ok_or(StoreError::NotFound)
    }

    /// Snapshot of every value, in map iteration order.
    pub async fn list(&self) -> Vec<V> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
