//! ProductDocument - the persisted shape of a product.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProductError;
use crate::service::proto::Product;
use crate::store::Document;
use crate::ObjectId;

/// Stored layout: `_id`, `category`, `title`, `price`, `quantity`.
///
/// `id` is `None` only before insertion; the store assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub category: String,
    pub title: String,
    pub price: String,
    pub quantity: String,
}

impl ProductDocument {
    /// The four mutable fields of `product`, without an id.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: None,
            category: product.category.clone(),
            title: product.title.clone(),
            price: product.price.clone(),
            quantity: product.quantity.clone(),
        }
    }

    /// Decode a stored document. The document must carry an `_id`.
    pub fn from_document(document: Document) -> Result<Self, ProductError> {
        let decoded: Self = serde_json::from_value(Value::Object(document))?;
        if decoded.id.is_none() {
            return Err(ProductError::Decode("missing _id".into()));
        }
        Ok(decoded)
    }

    pub fn into_document(self) -> Result<Document, ProductError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ProductError::Decode(format!(
                "product serialized to a non-object: {}",
                other
            ))),
        }
    }

    /// The wire product, with the id in its text form.
    pub fn into_product(self) -> Product {
        Product {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            category: self.category,
            title: self.title,
            price: self.price,
            quantity: self.quantity,
        }
    }
}
