//! Document store boundary.
//!
//! Collections hold untyped [`bson::Document`]s. Typed mapping happens in
//! [`crate::listings::records`]; nothing in this module knows about properties or
//! contact messages.

mod memory;
mod mongo;

use async_trait::async_trait;
use bson::{doc, Document};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Field the store uses for its own identifier. Never exposed to callers.
pub const INTERNAL_ID: &str = "_id";

/// Direction of a single-field sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub(crate) fn as_i32(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

/// Options for [`DocumentStore::find`]. Sort is applied before limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub projection: Option<Document>,
    pub sort: Option<SortOrder>,
    pub limit: Option<i64>,
}

impl FindQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortOrder {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Projection that drops the store's internal identifier.
pub fn without_internal_id() -> Document {
    doc! { INTERNAL_ID: 0 }
}

/// Storage abstraction so the service can run against MongoDB or in memory.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Returns the number of documents written.
    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize, StoreError>;

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        query: FindQuery,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>, StoreError>;

    /// Returns the number of documents removed (0 or 1).
    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError>;

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError>;

    /// Releases the underlying connection.
    async fn close(&self) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid store connection settings: {0}")]
    Connection(String),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}
