//! service - the `product.ProductService` gRPC surface.
//!
//! [`ProductHandler`] implements the five RPCs over an injected
//! [`Collection`](crate::store::Collection). Errors reach callers as a
//! `tonic::Status` whose code is one of the four [`ErrorKind`]s.
//!
//! ## RPCs
//!
//! - `CreateProduct` - insert, returns the product with its assigned id.
//! - `GetProduct` - fetch by id.
//! - `UpdateProduct` - replace the four mutable fields, returns the new state.
//! - `DeleteProduct` - remove by id, returns `success = true`.
//! - `GetAllProducts` - server-streams every product.
//!
//! ## Example
//!
//! ```ignore
//! use product_service::service::{self, ProductHandler};
//! use product_service::store::InMemoryDatabase;
//!
//! let handler = ProductHandler::new(InMemoryDatabase::new("mydb").collection("products"));
//!
//! // Get the server to compose with other tonic routes
//! let grpc_svc = service::grpc_server(handler.clone());
//!
//! // Or serve directly until Ctrl-C
//! service::serve(handler, "0.0.0.0:1337".parse()?, Duration::from_secs(10), async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! ```

mod error;
mod handler;
pub mod proto;
mod server;

pub use error::{ErrorKind, ServiceError};
pub use handler::{GetAllProductsStream, ProductHandler, ServiceStream};
pub use server::{grpc_server, serve, serve_with_incoming};
