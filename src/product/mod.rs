//! Products - mapping between the wire `Product` and its stored document.
//!
//! [`ProductStore`] wraps a [`Collection`](crate::store::Collection) and
//! speaks in wire products and [`ObjectId`](crate::ObjectId)s. It never
//! classifies failures for callers; every store error is passed up as
//! [`ProductError::Store`] so the RPC layer can decide what it means.
//!
//! ## Example
//!
//! ```ignore
//! use product_service::product::ProductStore;
//! use product_service::store::InMemoryDatabase;
//! use product_service::Product;
//!
//! let products = ProductStore::new(InMemoryDatabase::new("mydb").collection("products"));
//! let created = products.create(Product::new("books", "Go", "9.99", "3")).await?;
//! let id = created.id.parse()?;
//! let fetched = products.get(&id).await?;
//! ```

mod document;
mod store;

use std::fmt;

use crate::store::StoreError;
use crate::ObjectId;

pub use document::ProductDocument;
pub use store::{ProductStore, ProductStream};

/// Error type for product store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// No document has this id.
    NotFound(ObjectId),
    /// A stored document does not have the product shape.
    Decode(String),
    /// The document store failed.
    Store(StoreError),
}

impl fmt::Display for ProductError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductError::NotFound(id) => write!(f, "product not found: {}", id),
            ProductError::Decode(msg) => write!(f, "product decode failed: {}", msg),
            ProductError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProductError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProductError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ProductError {
    fn from(err: StoreError) -> Self {
        ProductError::Store(err)
    }
}

impl From<serde_json::Error> for ProductError {
    fn from(err: serde_json::Error) -> Self {
        ProductError::Decode(err.to_string())
    }
}
