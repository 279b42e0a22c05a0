//! ProductHandler - one procedure per RPC verb.
//!
//! Each procedure decodes its input, calls the [`ProductStore`], and turns
//! the outcome into a response or a classified [`ServiceError`]. This is the
//! only place where store failures are given a caller-facing meaning:
//!
//! | outcome                                   | kind             |
//! |-------------------------------------------|------------------|
//! | id is not 24 hex digits                   | invalid-argument |
//! | id matches nothing                        | not-found        |
//! | stored document undecodable (Get, Update) | not-found        |
//! | stored document undecodable (ListAll)     | unavailable      |
//! | store or cursor failure                   | internal         |
//!
//! Ids are decoded before any store call. Nothing is retried.

use std::pin::Pin;

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tonic::{Request, Response, Status};
use tracing::{error, info, instrument, warn};

use super::error::{ErrorKind, ServiceError};
use super::proto::{
    CreateProductReq, CreateProductRes, DeleteProductReq, DeleteProductRes, GetAllProductsReq,
    GetAllProductsRes, GetProductReq, GetProductRes, Product, ProductService, UpdateProductReq,
    UpdateProductRes,
};
use crate::product::{ProductError, ProductStore};
use crate::store::{Collection, StoreError};
use crate::ObjectId;

/// Server-streaming response type for `GetAllProducts`.
pub type GetAllProductsStream =
    Pin<Box<dyn Stream<Item = Result<GetAllProductsRes, Status>> + Send + 'static>>;

/// Products streamed by [`ProductHandler::list`], with errors already classified.
pub type ServiceStream = BoxStream<'static, Result<Product, ServiceError>>;

/// Stateless RPC handler over an injected collection handle.
#[derive(Clone)]
pub struct ProductHandler<C> {
    products: ProductStore<C>,
}

impl<C: Collection + 'static> ProductHandler<C> {
    pub fn new(collection: C) -> Self {
        Self {
            products: ProductStore::new(collection),
        }
    }

    /// Get a reference to the product store.
    pub fn store(&self) -> &ProductStore<C> {
        &self.products
    }

    /// Persist a new product. Returns it with its assigned id.
    pub async fn create(&self, product: Product) -> Result<Product, ServiceError> {
        let created = self.products.create(product).await.map_err(|e| {
            let err = ServiceError::internal(format!("Internal error: {}", e));
            log_failure("create", &err);
            err
        })?;
        info!(id = %created.id, "product created");
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<Product, ServiceError> {
        let oid = parse_id(id)?;
        self.products.get(&oid).await.map_err(|e| {
            let err = match e {
                ProductError::NotFound(_) | ProductError::Decode(_) => ServiceError::not_found(
                    format!("Could not find product with Object Id {}: {}", id, e),
                ),
                ProductError::Store(e) => store_failure(e),
            };
            log_failure("get", &err);
            err
        })
    }

    /// Replace the mutable fields of the product named by `product.id`.
    pub async fn update(&self, product: Product) -> Result<Product, ServiceError> {
        let oid = parse_id(&product.id)?;
        let updated = self.products.update(&oid, &product).await.map_err(|e| {
            let err = match e {
                ProductError::NotFound(_) | ProductError::Decode(_) => ServiceError::not_found(
                    format!("Could not find product with supplied ID {}: {}", product.id, e),
                ),
                ProductError::Store(e) => store_failure(e),
            };
            log_failure("update", &err);
            err
        })?;
        info!(id = %updated.id, "product updated");
        Ok(updated)
    }

    /// Remove the product with `id`. Deleting an absent product is not-found.
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let oid = parse_id(id)?;
        self.products.delete(&oid).await.map_err(|e| {
            let err = match e {
                ProductError::Store(e) => store_failure(e),
                other => ServiceError::not_found(format!(
                    "Could not delete product with Object Id {}: {}",
                    id, other
                )),
            };
            log_failure("delete", &err);
            err
        })?;
        info!(%id, "product deleted");
        Ok(true)
    }

    /// Stream every product in store order.
    ///
    /// A decode failure yields one `Unavailable` error and ends the stream;
    /// a cursor failure yields one `Internal` error and ends it.
    pub async fn list(&self) -> Result<ServiceStream, ServiceError> {
        let products = self.products.list().await.map_err(|e| {
            let err = ServiceError::internal(format!("Unknown internal error: {}", e));
            log_failure("list", &err);
            err
        })?;

        Ok(products
            .map(|item| {
                item.map_err(|e| {
                    let err = match e {
                        ProductError::Store(StoreError::Cursor(msg)) => {
                            ServiceError::internal(format!("Unknown cursor error: {}", msg))
                        }
                        ProductError::Store(e) => store_failure(e),
                        other => {
                            ServiceError::unavailable(format!("Could not decode data: {}", other))
                        }
                    };
                    log_failure("list", &err);
                    err
                })
            })
            .boxed())
    }
}

/// Decode a wire id. Fails closed on anything that is not 24 hex digits.
fn parse_id(id: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(id).map_err(|e| {
        let err = ServiceError::invalid_argument(format!("Could not convert to ObjectId: {}", e));
        log_failure("parse_id", &err);
        err
    })
}

fn store_failure(err: StoreError) -> ServiceError {
    ServiceError::internal(format!("Internal error: {}", err))
}

fn log_failure(operation: &'static str, err: &ServiceError) {
    match err.kind() {
        ErrorKind::InvalidArgument | ErrorKind::NotFound => {
            warn!(operation, kind = ?err.kind(), error = %err.message(), "request failed")
        }
        ErrorKind::Unavailable | ErrorKind::Internal => {
            error!(operation, kind = ?err.kind(), error = %err.message(), "request failed")
        }
    }
}

// ---------------------------------------------------------------------------
// gRPC service implementation
// ---------------------------------------------------------------------------

#[tonic::async_trait]
impl<C: Collection + 'static> ProductService for ProductHandler<C> {
    type GetAllProductsStream = GetAllProductsStream;

    #[instrument(name = "rpc_create_product", skip(self, request))]
    async fn create_product(
        &self,
        request: Request<CreateProductReq>,
    ) -> Result<Response<CreateProductRes>, Status> {
        // An absent product is an all-empty one; content is not validated.
        let product = request.into_inner().product.unwrap_or_default();
        let product = self.create(product).await?;
        Ok(Response::new(CreateProductRes {
            product: Some(product),
        }))
    }

    #[instrument(name = "rpc_get_product", skip(self, request))]
    async fn get_product(
        &self,
        request: Request<GetProductReq>,
    ) -> Result<Response<GetProductRes>, Status> {
        let req = request.into_inner();
        let product = self.get(&req.id).await?;
        Ok(Response::new(GetProductRes {
            product: Some(product),
        }))
    }

    #[instrument(name = "rpc_update_product", skip(self, request))]
    async fn update_product(
        &self,
        request: Request<UpdateProductReq>,
    ) -> Result<Response<UpdateProductRes>, Status> {
        let product = request.into_inner().product.unwrap_or_default();
        let product = self.update(product).await?;
        Ok(Response::new(UpdateProductRes {
            product: Some(product),
        }))
    }

    #[instrument(name = "rpc_delete_product", skip(self, request))]
    async fn delete_product(
        &self,
        request: Request<DeleteProductReq>,
    ) -> Result<Response<DeleteProductRes>, Status> {
        let req = request.into_inner();
        let success = self.delete(&req.id).await?;
        Ok(Response::new(DeleteProductRes { success }))
    }

    #[instrument(name = "rpc_get_all_products", skip(self, _request))]
    async fn get_all_products(
        &self,
        _request: Request<GetAllProductsReq>,
    ) -> Result<Response<Self::GetAllProductsStream>, Status> {
        let products = self.list().await?;
        let responses: Self::GetAllProductsStream = Box::pin(products.map(|item| {
            item.map(|product| GetAllProductsRes {
                product: Some(product),
            })
            .map_err(Status::from)
        }));
        Ok(Response::new(responses))
    }
}
