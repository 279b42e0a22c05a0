//! Wire messages for `product.ProductService` and the generated server/client.
//!
//! Messages are prost structs (standard protobuf wire format, no `.proto`
//! file); the service plumbing is generated by `build.rs`.

// ---------------------------------------------------------------------------
// Message types
// ---------------------------------------------------------------------------

/// A product as it travels over the wire. `id` is empty until persisted.
#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct Product {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub category: String,
    #[prost(string, tag = "3")]
    pub title: String,
    #[prost(string, tag = "4")]
    pub price: String,
    #[prost(string, tag = "5")]
    pub quantity: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateProductReq {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateProductRes {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetProductReq {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetProductRes {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

/// The product to update; its `id` selects the stored document.
#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateProductReq {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateProductRes {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteProductReq {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteProductRes {
    #[prost(bool, tag = "1")]
    pub success: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAllProductsReq {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAllProductsRes {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

impl Product {
    /// A product that has not been persisted yet.
    pub fn new(
        category: impl Into<String>,
        title: impl Into<String>,
        price: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            category: category.into(),
            title: title.into(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Generated service trait + server/client
// ---------------------------------------------------------------------------

include!(concat!(env!("OUT_DIR"), "/product.ProductService.rs"));

pub use product_service_client::ProductServiceClient;
pub use product_service_server::{ProductService, ProductServiceServer};
