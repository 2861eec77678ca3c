//! Document store seam.
//!
//! Documents are JSON objects addressed by (collection, id). Reads and writes
//! are asynchronous and report failures as `StoreError` values.

pub mod id;
pub mod memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use id::{generate_document_id, is_valid_document_id};
pub use memory::MemoryDocumentStore;

/// Document store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Field filter applied by `DocumentStore::query`
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document in the collection
    All,
    /// `field == value`
    Eq { field: String, value: Value },
    /// `field` is one of `values`
    In { field: String, values: Vec<Value> },
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn is_in<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::In {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `document` passes this filter
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => document.get(field) == Some(value),
            Filter::In { field, values } => document
                .get(field)
                .map(|v| values.contains(v))
                .unwrap_or(false),
        }
    }
}

/// Asynchronous document store (Firestore-style collections of JSON documents)
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document, `None` when it does not exist
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Fetches every document of `collection` matching `filter`
    async fn query(&self, collection: &str, filter: Filter) -> StoreResult<Vec<Value>>;

    /// Creates or replaces a document
    async fn set(&self, collection: &str, id: &str, document: Value) -> StoreResult<()>;

    /// Allocates a fresh document id without writing anything
    fn new_id(&self, collection: &str) -> String;
}

/// Deserializes a raw document into a typed record
pub fn decode<T: DeserializeOwned>(document: Value) -> StoreResult<T> {
    Ok(serde_json::from_value(document)?)
}

/// Serializes a typed record into a raw document
pub fn encode<T: Serialize>(record: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(record)?)
}
