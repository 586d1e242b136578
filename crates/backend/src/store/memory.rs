//! In-memory datastore adapter.
//!
//! Backs unit and integration tests, standing in for the managed document
//! store. Single shared id sequence across kinds, like the real store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use super::{Datastore, DatastoreError, Key, Kind};

/// A `HashMap`-backed document store.
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    docs: HashMap<Key, Value>,
}

impl MemoryDatastore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held, across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().docs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Datastore for MemoryDatastore {
    async fn get(&self, key: &Key) -> Result<Option<Value>, DatastoreError> {
        Ok(self.read().docs.get(key).cloned())
    }

    async fn insert(&self, kind: Kind, doc: &Value) -> Result<i64, DatastoreError> {
        let mut inner = self.write();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.docs.insert(Key::Id(kind, id), doc.clone());
        Ok(id)
    }

    async fn put(&self, key: &Key, doc: &Value) -> Result<(), DatastoreError> {
        self.write().docs.insert(key.clone(), doc.clone());
        Ok(())
    }

    async fn list(&self, kind: Kind) -> Result<Vec<(i64, Value)>, DatastoreError> {
        let inner = self.read();
        let mut docs: Vec<(i64, Value)> = inner
            .docs
            .iter()
            .filter_map(|(key, doc)| match key {
                Key::Id(k, id) if *k == kind => Some((*id, doc.clone())),
                _ => None,
            })
            .collect();
        docs.sort_by_key(|(id, _)| *id);
        Ok(docs)
    }

    async fn query(
        &self,
        kind: Kind,
        field: &str,
        value: &str,
    ) -> Result<Vec<(i64, Value)>, DatastoreError> {
        let inner = self.read();
        let mut matches: Vec<(i64, Value)> = inner
            .docs
            .iter()
            .filter_map(|(key, doc)| match key {
                Key::Id(k, id) if *k == kind => {
                    let matched = doc
                        .get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|v| v == value);
                    matched.then(|| (*id, doc.clone()))
                }
                _ => None,
            })
            .collect();
        matches.sort_by_key(|(id, _)| *id);
        Ok(matches)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryDatastore::new();
        let a = store.insert(Kind::User, &json!({"x": 1})).await.unwrap();
        let b = store.insert(Kind::Product, &json!({"x": 2})).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryDatastore::new();
        let got = store.get(&Key::Id(Kind::User, 99)).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_whole_document() {
        let store = MemoryDatastore::new();
        let key = Key::Name(Kind::TransactionCounter, "all-purchases".to_owned());
        store.put(&key, &json!({"count": 1})).await.unwrap();
        store.put(&key, &json!({"count": 2})).await.unwrap();
        let got = store.get(&key).await.unwrap().unwrap();
        assert_eq!(got, json!({"count": 2}));
    }

    #[tokio::test]
    async fn test_query_matches_string_field_within_kind() {
        let store = MemoryDatastore::new();
        let id = store
            .insert(Kind::User, &json!({"google_id": "g-1"}))
            .await
            .unwrap();
        store
            .insert(Kind::User, &json!({"google_id": "g-2"}))
            .await
            .unwrap();
        store
            .insert(Kind::Product, &json!({"google_id": "g-1"}))
            .await
            .unwrap();

        let hits = store.query(Kind::User, "google_id", "g-1").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, id);
    }
}
