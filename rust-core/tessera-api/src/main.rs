// SPDX-License-Identifier: MIT
//! Tessera API server binary.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tessera_api::{serve, ApiConfig};
use tessera_store::{MemoryQuadStore, QuadStore};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env();
    let store: Arc<dyn QuadStore> = Arc::new(MemoryQuadStore::new());
    info!(backend = store.name(), "tessera starting");

    serve(config, store).await
}
