//! product-server - serves product.ProductService until Ctrl-C.

use clap::Parser;
use tracing::{info, warn};

use product_service::config::ServerConfig;
use product_service::service::{self, ProductHandler};
use product_service::store::InMemoryDatabase;
use product_service::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();
    telemetry::init(&config.log);

    let database = InMemoryDatabase::new(&config.database);
    let collection = database.collection(&config.collection);
    info!(
        database = database.name(),
        collections = ?database.collection_names(),
        "opened document store"
    );
    let handler = ProductHandler::new(collection);

    service::serve(
        handler,
        config.listen,
        config.request_timeout(),
        shutdown_signal(),
    )
    .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("interrupt received, stopping server"),
        Err(e) => warn!(error = %e, "could not listen for ctrl-c, stopping server"),
    }
}
