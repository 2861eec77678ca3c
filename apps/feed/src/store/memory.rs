use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{generate_document_id, DocumentStore, Filter, StoreError, StoreResult};
use crate::config::MAX_IN_QUERY_VALUES;

type Collection = BTreeMap<String, Value>;

/// In-process document store.
///
/// Applies the same "in" filter ceiling as the hosted backend so callers that
/// forget to chunk fail here too. Results come back ordered by document id.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Collection>>,
    queries: Mutex<Vec<(String, Filter)>>,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document without counting it as a `set` call
    pub fn insert(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        let mut collections = self.lock_collections()?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    /// Number of documents in `collection`
    pub fn count(&self, collection: &str) -> usize {
        self.lock_collections()
            .map(|c| c.get(collection).map(BTreeMap::len).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Every (collection, filter) pair queried so far, in call order
    pub fn queries(&self) -> Vec<(String, Filter)> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn query_calls(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    fn lock_collections(
        &self,
    ) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, Collection>>> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

fn validate(filter: &Filter) -> StoreResult<()> {
    if let Filter::In { field, values } = filter {
        if values.is_empty() {
            return Err(StoreError::InvalidQuery(format!(
                "'in' filter on '{}' needs at least one value",
                field
            )));
        }
        if values.len() > MAX_IN_QUERY_VALUES {
            return Err(StoreError::InvalidQuery(format!(
                "'in' filter on '{}' supports up to {} values, got {}",
                field,
                MAX_IN_QUERY_VALUES,
                values.len()
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let collections = self.lock_collections()?;
        Ok(collections.get(collection).and_then(|c| c.get(id)).cloned())
    }

    async fn query(&self, collection: &str, filter: Filter) -> StoreResult<Vec<Value>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((collection.to_string(), filter.clone()));
        }
        validate(&filter)?;

        let collections = self.lock_collections()?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        let mut collections = self.lock_collections()?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    fn new_id(&self, _collection: &str) -> String {
        generate_document_id()
    }
}
