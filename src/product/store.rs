//! ProductStore - product CRUD over a document collection.

use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tracing::debug;

use super::{ProductDocument, ProductError};
use crate::service::proto::Product;
use crate::store::{Collection, Cursor};
use crate::ObjectId;

/// A lazy, finite, non-restartable sequence of products from a full scan.
///
/// The stream owns the scan cursor. The cursor is closed as soon as the scan
/// finishes or fails, and dropped with the stream if the consumer stops early.
/// After yielding an error the stream ends.
pub type ProductStream = BoxStream<'static, Result<Product, ProductError>>;

/// Product CRUD over a single collection. Stateless apart from the handle.
#[derive(Clone)]
pub struct ProductStore<C> {
    collection: C,
}

impl<C: Collection> ProductStore<C> {
    pub fn new(collection: C) -> Self {
        Self { collection }
    }

    /// Get a reference to the underlying collection.
    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Insert `product` and return it with the store-assigned id attached.
    ///
    /// Any id already present on `product` is ignored.
    pub async fn create(&self, mut product: Product) -> Result<Product, ProductError> {
        let document = ProductDocument::from_product(&product).into_document()?;
        let id = self.collection.insert_one(document).await?;
        debug!(%id, "inserted product document");
        product.id = id.to_hex();
        Ok(product)
    }

    pub async fn get(&self, id: &ObjectId) -> Result<Product, ProductError> {
        let document = self
            .collection
            .find_one(id)
            .await?
            .ok_or(ProductError::NotFound(*id))?;
        Ok(ProductDocument::from_document(document)?.into_product())
    }

    /// Overwrite the four mutable fields of the product with `id`.
    ///
    /// Returns the product as stored after the replacement; its id comes from
    /// the matched document, not from `product`.
    pub async fn update(&self, id: &ObjectId, product: &Product) -> Result<Product, ProductError> {
        let replacement = ProductDocument::from_product(product).into_document()?;
        let document = self
            .collection
            .find_one_and_replace(id, replacement)
            .await?
            .ok_or(ProductError::NotFound(*id))?;
        Ok(ProductDocument::from_document(document)?.into_product())
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<(), ProductError> {
        match self.collection.delete_one(id).await? {
            0 => Err(ProductError::NotFound(*id)),
            _ => Ok(()),
        }
    }

    /// Open a full scan and stream the decoded products.
    pub async fn list(&self) -> Result<ProductStream, ProductError> {
        let cursor = self.collection.find_all().await?;
        Ok(scan(cursor).boxed())
    }
}

/// Drain `cursor`, decoding each document. `None` state means the scan is over.
fn scan<K: Cursor>(cursor: K) -> impl futures::Stream<Item = Result<Product, ProductError>> + Send {
    stream::unfold(Some(cursor), |state| async move {
        let mut cursor = match state {
            Some(cursor) => cursor,
            None => return None,
        };
        match cursor.next().await {
            Ok(Some(document)) => match ProductDocument::from_document(document) {
                Ok(decoded) => Some((Ok(decoded.into_product()), Some(cursor))),
                Err(err) => {
                    cursor.close();
                    Some((Err(err), None))
                }
            },
            Ok(None) => {
                cursor.close();
                None
            }
            Err(err) => {
                cursor.close();
                Some((Err(ProductError::Store(err)), None))
            }
        }
    })
}
