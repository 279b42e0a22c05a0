//! Command-line and environment configuration for the server and client.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

/// Default address the server listens on and the client dials.
pub const DEFAULT_PORT: u16 = 1337;

/// `product-server` settings.
#[derive(Debug, Clone, Parser)]
#[command(name = "product-server", about = "Serve product.ProductService over gRPC")]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[arg(long, env = "PRODUCT_LISTEN", default_value = "0.0.0.0:1337")]
    pub listen: SocketAddr,

    /// Name of the database holding the product collection.
    #[arg(long, env = "PRODUCT_DATABASE", default_value = "mydb")]
    pub database: String,

    /// Collection products are stored in.
    #[arg(long, env = "PRODUCT_COLLECTION", default_value = "products")]
    pub collection: String,

    /// Upper bound on a single call, in seconds.
    #[arg(long, env = "PRODUCT_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Default log filter; `RUST_LOG` takes precedence when set.
    #[arg(long, env = "PRODUCT_LOG", default_value = "info")]
    pub log: String,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `product-client` settings and command.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "product-client",
    about = "A gRPC client to communicate with the ProductService server"
)]
pub struct ClientConfig {
    /// Server endpoint.
    #[arg(long, env = "PRODUCT_SERVER", default_value = "http://localhost:1337")]
    pub server: String,

    /// Give up on a call after this many seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: ClientCommand,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum ClientCommand {
    /// Create a new product.
    Create(CreateArgs),
    /// Find a product by its id.
    Get(IdArgs),
    /// Replace a product's fields. Omitted fields are sent empty.
    Update(UpdateArgs),
    /// Delete a product by its id.
    Delete(IdArgs),
    /// Stream every product.
    List,
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    #[arg(short, long)]
    pub category: String,
    #[arg(short, long)]
    pub title: String,
    #[arg(short, long)]
    pub price: String,
    #[arg(short, long)]
    pub quantity: String,
}

#[derive(Debug, Clone, Args)]
pub struct IdArgs {
    /// The id of the product.
    #[arg(short, long)]
    pub id: String,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// The id of the product.
    #[arg(short, long)]
    pub id: String,
    #[arg(short, long, default_value = "")]
    pub category: String,
    #[arg(short, long, default_value = "")]
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub price: String,
    #[arg(short, long, default_value = "")]
    pub quantity: String,
}
