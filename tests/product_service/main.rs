//! product_service integration tests.

mod support;
mod cancellation;
mod transport_grpc;
