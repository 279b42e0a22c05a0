//! gRPC transport integration tests.
//!
//! Starts a tonic server on an ephemeral port and exercises it with the
//! generated client.

use std::time::Duration;

use product_service::service::proto::{
    CreateProductReq, DeleteProductReq, GetAllProductsReq, GetProductReq, ProductServiceClient,
    UpdateProductReq,
};
use product_service::service::{self, ProductHandler};
use product_service::store::{Document, InMemoryCollection};
use product_service::{ObjectId, Product};
use serde_json::json;
use tokio::net::TcpListener;
use tonic::transport::Channel;
use tonic::Code;

use crate::support::books_go;

/// Bind to port 0, spawn the gRPC server, and return a connected client plus
/// the collection it serves.
async fn start_server() -> (ProductServiceClient<Channel>, InMemoryCollection) {
    let collection = InMemoryCollection::new("products");
    let handler = ProductHandler::new(collection.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        service::serve_with_incoming(
            handler,
            listener,
            Duration::from_secs(10),
            std::future::pending(),
        )
        .await
        .unwrap();
    });

    // Connect client
    let endpoint = format!("http://{addr}");
    let client = ProductServiceClient::connect(endpoint).await.unwrap();
    (client, collection)
}

#[tokio::test]
async fn create_get_update_delete() {
    let (mut client, _) = start_server().await;

    // Create
    let created = client
        .create_product(CreateProductReq {
            product: Some(books_go()),
        })
        .await
        .unwrap()
        .into_inner()
        .product
        .unwrap();
    assert_eq!(created.id.len(), 24);
    assert_eq!(created, books_go().with_id(created.id.clone()));

    // Get
    let fetched = client
        .get_product(GetProductReq {
            id: created.id.clone(),
        })
        .await
        .unwrap()
        .into_inner()
        .product
        .unwrap();
    assert_eq!(fetched, created);

    // Update
    let updated = client
        .update_product(UpdateProductReq {
            product: Some(Product::new("books", "Go", "8.99", "3").with_id(created.id.clone())),
        })
        .await
        .unwrap()
        .into_inner()
        .product
        .unwrap();
    assert_eq!(updated.price, "8.99");
    assert_eq!(updated.id, created.id);

    // Delete
    let deleted = client
        .delete_product(DeleteProductReq {
            id: created.id.clone(),
        })
        .await
        .unwrap()
        .into_inner();
    assert!(deleted.success);

    // Gone
    let status = client
        .get_product(GetProductReq { id: created.id })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn malformed_id_is_invalid_argument() {
    let (mut client, collection) = start_server().await;

    let status = client
        .get_product(GetProductReq {
            id: "not-an-id".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    // An update without a product has no id at all.
    let status = client
        .update_product(UpdateProductReq { product: None })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = client
        .delete_product(DeleteProductReq { id: String::new() })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    assert_eq!(collection.operation_count(), 0);
}

#[tokio::test]
async fn delete_unknown_is_not_found() {
    let (mut client, _) = start_server().await;

    let status = client
        .delete_product(DeleteProductReq {
            id: ObjectId::new().to_hex(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn create_without_product_stores_empty_fields() {
    let (mut client, collection) = start_server().await;

    let created = client
        .create_product(CreateProductReq { product: None })
        .await
        .unwrap()
        .into_inner()
        .product
        .unwrap();
    assert_eq!(created, Product::default().with_id(created.id.clone()));
    assert_eq!(collection.len(), 1);
}

#[tokio::test]
async fn get_all_products_streams_everything() {
    let (mut client, collection) = start_server().await;
    for i in 0..4 {
        client
            .create_product(CreateProductReq {
                product: Some(Product::new("books", format!("t{}", i), "1", "1")),
            })
            .await
            .unwrap();
    }

    let mut stream = client
        .get_all_products(GetAllProductsReq {})
        .await
        .unwrap()
        .into_inner();

    let mut titles = Vec::new();
    while let Some(res) = stream.message().await.unwrap() {
        titles.push(res.product.unwrap().title);
    }
    assert_eq!(titles, vec!["t0", "t1", "t2", "t3"]);
    assert_eq!(collection.open_cursors(), 0);
}

#[tokio::test]
async fn get_all_products_reports_unavailable_mid_stream() {
    let (mut client, collection) = start_server().await;
    client
        .create_product(CreateProductReq {
            product: Some(books_go()),
        })
        .await
        .unwrap();
    let mut broken = Document::new();
    broken.insert("quantity".into(), json!(3));
    collection
        .insert_raw(ObjectId::from_bytes([0xff; 12]), broken)
        .unwrap();

    let mut stream = client
        .get_all_products(GetAllProductsReq {})
        .await
        .unwrap()
        .into_inner();

    let first = stream.message().await.unwrap().unwrap();
    assert_eq!(first.product.unwrap().title, "Go");

    let status = stream.message().await.unwrap_err();
    assert_eq!(status.code(), Code::Unavailable);
}

#[tokio::test]
async fn hanging_up_mid_stream_releases_the_cursor() {
    let (mut client, collection) = start_server().await;
    for _ in 0..3 {
        client
            .create_product(CreateProductReq {
                product: Some(books_go()),
            })
            .await
            .unwrap();
    }

    let mut stream = client
        .get_all_products(GetAllProductsReq {})
        .await
        .unwrap()
        .into_inner();
    stream.message().await.unwrap().unwrap();
    drop(stream);

    let mut released = false;
    for _ in 0..100 {
        if collection.open_cursors() == 0 {
            released = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(released, "cursor still open after the client hung up");
}
