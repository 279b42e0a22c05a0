//! product-client - command-line access to product.ProductService.

use clap::Parser;
use tonic::transport::Endpoint;

use product_service::config::{ClientCommand, ClientConfig};
use product_service::service::proto::{
    CreateProductReq, DeleteProductReq, GetAllProductsReq, GetProductReq, ProductServiceClient,
    UpdateProductReq,
};
use product_service::Product;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::parse();

    let channel = Endpoint::from_shared(config.server.clone())?
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .connect()
        .await?;
    let mut client = ProductServiceClient::new(channel);

    match config.command {
        ClientCommand::Create(args) => {
            let product = Product::new(args.category, args.title, args.price, args.quantity);
            let res = client
                .create_product(CreateProductReq {
                    product: Some(product),
                })
                .await?
                .into_inner();
            let id = res.product.map(|p| p.id).unwrap_or_default();
            println!("Product created: {}", id);
        }
        ClientCommand::Get(args) => {
            let res = client
                .get_product(GetProductReq { id: args.id })
                .await?
                .into_inner();
            if let Some(product) = res.product {
                print_product(&product);
            }
        }
        ClientCommand::Update(args) => {
            let product = Product::new(args.category, args.title, args.price, args.quantity)
                .with_id(args.id);
            let res = client
                .update_product(UpdateProductReq {
                    product: Some(product),
                })
                .await?
                .into_inner();
            if let Some(product) = res.product {
                print_product(&product);
            }
        }
        ClientCommand::Delete(args) => {
            let res = client
                .delete_product(DeleteProductReq { id: args.id.clone() })
                .await?
                .into_inner();
            if res.success {
                println!("Successfully deleted the product with id {}", args.id);
            }
        }
        ClientCommand::List => {
            let mut stream = client
                .get_all_products(GetAllProductsReq {})
                .await?
                .into_inner();
            while let Some(res) = stream.message().await? {
                if let Some(product) = res.product {
                    print_product(&product);
                }
            }
        }
    }

    Ok(())
}

fn print_product(product: &Product) {
    println!(
        "id: {}  category: {}  title: {}  price: {}  quantity: {}",
        product.id, product.category, product.title, product.price, product.quantity
    );
}
