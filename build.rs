fn main() {
    // The ProductService RPCs are declared here instead of in a `.proto` file.
    // Message types are hand-written prost structs in `src/service/proto.rs`.
    let service = tonic_build::manual::Service::builder()
        .name("ProductService")
        .package("product")
        .method(unary("create_product", "CreateProduct", "CreateProductReq", "CreateProductRes"))
        .method(unary("get_product", "GetProduct", "GetProductReq", "GetProductRes"))
        .method(unary("update_product", "UpdateProduct", "UpdateProductReq", "UpdateProductRes"))
        .method(unary("delete_product", "DeleteProduct", "DeleteProductReq", "DeleteProductRes"))
        .method(
            tonic_build::manual::Method::builder()
                .name("get_all_products")
                .route_name("GetAllProducts")
                .input_type("crate::service::proto::GetAllProductsReq")
                .output_type("crate::service::proto::GetAllProductsRes")
                .codec_path("tonic::codec::ProstCodec")
                .server_streaming()
                .build(),
        )
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}

fn unary(
    name: &str,
    route: &str,
    input: &str,
    output: &str,
) -> tonic_build::manual::Method {
    tonic_build::manual::Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::service::proto::{input}"))
        .output_type(format!("crate::service::proto::{output}"))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}
