//! Document store - collection-scoped access to schema-flexible documents.
//!
//! A [`Collection`] holds JSON-object documents addressed by an
//! [`ObjectId`] stored under the `_id` field. The store owns identifiers:
//! `insert_one` generates them and returns the new key.
//!
//! Full scans hand out a [`Cursor`], which stays open until it is closed or
//! dropped. Implementations must be safe to share between concurrent calls.
//!
//! ## Example
//!
//! ```ignore
//! use product_service::store::{Collection, Cursor, InMemoryDatabase};
//!
//! let products = InMemoryDatabase::new("mydb").collection("products");
//! let id = products.insert_one(doc).await?;
//! let found = products.find_one(&id).await?;
//!
//! let mut cursor = products.find_all().await?;
//! while let Some(doc) = cursor.next().await? {
//!     // ...
//! }
//! cursor.close();
//! ```

mod in_memory;

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::ObjectId;

pub use in_memory::{Failure, InMemoryCollection, InMemoryCursor, InMemoryDatabase};

/// A stored record: a JSON object. The key lives under [`ID_FIELD`].
pub type Document = Map<String, Value>;

/// Field holding a document's [`ObjectId`].
pub const ID_FIELD: &str = "_id";

/// Error type for document store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not complete the operation (connectivity, storage).
    Io(String),
    /// A scan cursor failed while advancing.
    Cursor(String),
    /// The request was rejected by the store (e.g. caller-supplied `_id`).
    Rejected(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "store i/o error: {}", msg),
            StoreError::Cursor(msg) => write!(f, "cursor error: {}", msg),
            StoreError::Rejected(msg) => write!(f, "rejected by store: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// A named set of documents.
#[async_trait]
pub trait Collection: Send + Sync {
    type Cursor: Cursor;

    /// Insert a document without `_id`. Returns the generated key.
    async fn insert_one(&self, document: Document) -> Result<ObjectId, StoreError>;

    /// Fetch the document whose `_id` equals `id`.
    async fn find_one(&self, id: &ObjectId) -> Result<Option<Document>, StoreError>;

    /// Replace every field except `_id` of the matching document and return
    /// the document as it is after the replacement.
    async fn find_one_and_replace(
        &self,
        id: &ObjectId,
        replacement: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Delete the matching document. Returns how many documents were removed.
    async fn delete_one(&self, id: &ObjectId) -> Result<u64, StoreError>;

    /// Open a cursor over every document, in the store's natural order.
    async fn find_all(&self) -> Result<Self::Cursor, StoreError>;
}

/// A stateful handle over scan results.
///
/// Dropping a cursor releases it; `close` does the same explicitly.
#[async_trait]
pub trait Cursor: Send + 'static {
    /// Advance. `Ok(None)` means the scan is exhausted.
    async fn next(&mut self) -> Result<Option<Document>, StoreError>;

    /// Release the cursor.
    fn close(self)
    where
        Self: Sized,
    {
        drop(self)
    }
}
