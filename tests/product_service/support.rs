//! Shared fixtures: an in-memory handler and sample products.

use product_service::store::InMemoryCollection;
use product_service::{Product, ProductHandler};

pub type Handler = ProductHandler<InMemoryCollection>;

/// Ids that are not 24 hex digits.
pub const MALFORMED_IDS: &[&str] = &[
    "",
    "123",
    "not-an-object-id",
    "5d8a3f2b9c1e4a001234567",
    "5d8a3f2b9c1e4a00123456789",
    "5d8a3f2b-c1e4a0012345678",
    "zzzzzzzzzzzzzzzzzzzzzzzz",
];

pub fn handler() -> Handler {
    ProductHandler::new(InMemoryCollection::new("products"))
}

pub fn collection(handler: &Handler) -> &InMemoryCollection {
    handler.store().collection()
}

pub fn books_go() -> Product {
    Product::new("books", "Go", "9.99", "3")
}
