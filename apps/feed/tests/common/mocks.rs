//! Mock collaborators with call counting and failure injection

use async_trait::async_trait;
use bytes::Bytes;
use savoreel_feed::media::{MediaError, MediaHost, UploadOptions, UploadedAsset};
use savoreel_feed::store::{DocumentStore, Filter, MemoryDocumentStore, StoreError, StoreResult};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Media host that either accepts every upload or rejects every upload
pub struct MockMediaHost {
    reject_with: Option<String>,
    calls: AtomicUsize,
    uploaded: Mutex<Vec<(usize, String)>>,
}

impl MockMediaHost {
    pub fn accepting() -> Self {
        Self {
            reject_with: None,
            calls: AtomicUsize::new(0),
            uploaded: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::accepting()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (byte length, folder) of every accepted upload
    pub fn uploaded(&self) -> Vec<(usize, String)> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaHost for MockMediaHost {
    async fn upload(
        &self,
        bytes: Bytes,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, MediaError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(message) = &self.reject_with {
            return Err(MediaError::Rejected {
                status: 400,
                message: message.clone(),
            });
        }

        self.uploaded
            .lock()
            .unwrap()
            .push((bytes.len(), options.folder.clone()));

        Ok(UploadedAsset {
            url: format!("https://media.example/{}/{}.jpg", options.folder, n),
            public_id: format!("{}/{}", options.folder, n),
        })
    }
}

/// Memory store that can fail selected operations
pub struct FlakyStore {
    pub inner: Arc<MemoryDocumentStore>,
    poisoned_author: Mutex<Option<String>>,
    attempts: Mutex<Vec<Filter>>,
    fail_all_queries: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryDocumentStore>) -> Self {
        Self {
            inner,
            poisoned_author: Mutex::new(None),
            attempts: Mutex::new(Vec::new()),
            fail_all_queries: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Fails any "in" query whose values include `author`
    pub fn poison_author(&self, author: &str) {
        *self.poisoned_author.lock().unwrap() = Some(author.to_string());
    }

    /// Every query filter received, failed ones included
    pub fn attempts(&self) -> Vec<Filter> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn fail_queries(&self) {
        self.fail_all_queries.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn is_poisoned(&self, filter: &Filter) -> bool {
        let poisoned = self.poisoned_author.lock().unwrap();
        match (poisoned.as_deref(), filter) {
            (Some(author), Filter::In { values, .. }) => {
                values.iter().any(|v| v.as_str() == Some(author))
            }
            _ => false,
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.inner.get(collection, id).await
    }

    async fn query(&self, collection: &str, filter: Filter) -> StoreResult<Vec<Value>> {
        self.attempts.lock().unwrap().push(filter.clone());
        if self.fail_all_queries.load(Ordering::SeqCst) || self.is_poisoned(&filter) {
            return Err(StoreError::Unavailable("backend offline".to_string()));
        }
        self.inner.query(collection, filter).await
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("permission denied".to_string()));
        }
        self.inner.set(collection, id, document).await
    }

    fn new_id(&self, collection: &str) -> String {
        self.inner.new_id(collection)
    }
}

/// Memory store whose n-th query sleeps for the n-th configured delay
pub struct DelayedStore {
    inner: Arc<MemoryDocumentStore>,
    delays: Vec<Duration>,
    started: AtomicUsize,
    completed: Mutex<Vec<usize>>,
    windows: Mutex<Vec<(Instant, Instant)>>,
}

impl DelayedStore {
    pub fn new(inner: Arc<MemoryDocumentStore>, delays_ms: &[u64]) -> Self {
        Self {
            inner,
            delays: delays_ms.iter().copied().map(Duration::from_millis).collect(),
            started: AtomicUsize::new(0),
            completed: Mutex::new(Vec::new()),
            windows: Mutex::new(Vec::new()),
        }
    }

    /// Query indices in the order they finished
    pub fn completion_order(&self) -> Vec<usize> {
        self.completed.lock().unwrap().clone()
    }

    /// (start, end) of every finished query, in completion order
    pub fn windows(&self) -> Vec<(Instant, Instant)> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for DelayedStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.inner.get(collection, id).await
    }

    async fn query(&self, collection: &str, filter: Filter) -> StoreResult<Vec<Value>> {
        let index = self.started.fetch_add(1, Ordering::SeqCst);
        let start = Instant::now();
        let delay = self.delays.get(index).copied().unwrap_or_default();
        tokio::time::sleep(delay).await;

        let result = self.inner.query(collection, filter).await;
        self.completed.lock().unwrap().push(index);
        self.windows.lock().unwrap().push((start, Instant::now()));
        result
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        self.inner.set(collection, id, document).await
    }

    fn new_id(&self, collection: &str) -> String {
        self.inner.new_id(collection)
    }
}
