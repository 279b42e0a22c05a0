//! Convenience constructors for serving a `ProductHandler` with tonic.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

use super::handler::ProductHandler;
use super::proto::ProductServiceServer;
use crate::store::Collection;

/// Create a `ProductServiceServer` around `handler`.
pub fn grpc_server<C: Collection + 'static>(
    handler: ProductHandler<C>,
) -> ProductServiceServer<ProductHandler<C>> {
    ProductServiceServer::new(handler)
}

/// Bind `addr` and serve until `shutdown` resolves.
///
/// `request_timeout` bounds every call; a call that exceeds it is cancelled
/// along with its in-flight store operation.
pub async fn serve<C, F>(
    handler: ProductHandler<C>,
    addr: SocketAddr,
    request_timeout: Duration,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    C: Collection + 'static,
    F: Future<Output = ()>,
{
    info!(%addr, "serving product.ProductService");
    Server::builder()
        .timeout(request_timeout)
        .add_service(grpc_server(handler))
        .serve_with_shutdown(addr, shutdown)
        .await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_with_incoming<C, F>(
    handler: ProductHandler<C>,
    listener: TcpListener,
    request_timeout: Duration,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    C: Collection + 'static,
    F: Future<Output = ()>,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "serving product.ProductService");
    }
    Server::builder()
        .timeout(request_timeout)
        .add_service(grpc_server(handler))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}
