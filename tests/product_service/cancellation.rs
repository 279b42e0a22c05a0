//! Cancellation tests - a call that is dropped or times out abandons its
//! in-flight store operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use product_service::service::proto::{GetProductReq, ProductServiceClient};
use product_service::service::{self, ProductHandler};
use product_service::store::{Collection, Cursor, Document, StoreError};
use product_service::ObjectId;
use tokio::net::TcpListener;
use tonic::Code;

/// Sets its flag when dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// A collection whose `find_one` never completes.
#[derive(Clone, Default)]
struct StalledCollection {
    started: Arc<AtomicBool>,
    dropped: Arc<AtomicBool>,
}

impl StalledCollection {
    fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    fn dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }

    async fn wait_until_dropped(&self) -> bool {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !self.dropped() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .is_ok()
    }
}

struct EmptyCursor;

#[async_trait]
impl Cursor for EmptyCursor {
    async fn next(&mut self) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }
}

#[async_trait]
impl Collection for StalledCollection {
    type Cursor = EmptyCursor;

    async fn insert_one(&self, _document: Document) -> Result<ObjectId, StoreError> {
        Ok(ObjectId::new())
    }

    async fn find_one(&self, _id: &ObjectId) -> Result<Option<Document>, StoreError> {
        let _flag = DropFlag(self.dropped.clone());
        self.started.store(true, Ordering::SeqCst);
        std::future::pending().await
    }

    async fn find_one_and_replace(
        &self,
        _id: &ObjectId,
        _replacement: Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }

    async fn delete_one(&self, _id: &ObjectId) -> Result<u64, StoreError> {
        Ok(0)
    }

    async fn find_all(&self) -> Result<Self::Cursor, StoreError> {
        Ok(EmptyCursor)
    }
}

#[tokio::test]
async fn dropping_a_get_drops_the_store_call() {
    let collection = StalledCollection::default();
    let handler = ProductHandler::new(collection.clone());
    let id = ObjectId::new().to_hex();

    let result = tokio::time::timeout(Duration::from_millis(50), handler.get(&id)).await;

    assert!(result.is_err());
    assert!(collection.started());
    assert!(collection.dropped());
}

#[tokio::test]
async fn server_timeout_cancels_a_stalled_get() {
    let collection = StalledCollection::default();
    let handler = ProductHandler::new(collection.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        service::serve_with_incoming(
            handler,
            listener,
            Duration::from_millis(100),
            std::future::pending(),
        )
        .await
        .unwrap();
    });

    let mut client = ProductServiceClient::connect(format!("http://{addr}"))
        .await
        .unwrap();
    let status = client
        .get_product(GetProductReq {
            id: ObjectId::new().to_hex(),
        })
        .await
        .unwrap_err();

    assert!(
        matches!(status.code(), Code::Cancelled | Code::DeadlineExceeded),
        "unexpected status {:?}",
        status
    );
    assert!(collection.started());
    assert!(collection.wait_until_dropped().await);
}
