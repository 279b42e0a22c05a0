//! product_service - a gRPC product catalogue over a document store.
//!
//! - [`service`]: the RPC handler, error taxonomy and tonic plumbing.
//! - [`product`]: mapping between wire products and stored documents.
//! - [`store`]: the document-store collaborator and an in-memory backend.
//! - [`ObjectId`]: the store's 12-byte key and its hex text form.

pub mod config;
mod object_id;
pub mod product;
pub mod service;
pub mod store;
pub mod telemetry;

pub use object_id::{ObjectId, ObjectIdError};
pub use product::{ProductError, ProductStore};
pub use service::proto::Product;
pub use service::{ErrorKind, ProductHandler, ServiceError};
pub use store::{Collection, Cursor, InMemoryCollection, InMemoryDatabase, StoreError};
