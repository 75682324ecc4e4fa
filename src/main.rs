use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinerec_api::{
    config::Config,
    routes::{create_router, AppState},
    store::{ModelStore, StoreError},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Load the offline-built artifact once; it is shared read-only with
    // every handler for the lifetime of the process
    let store = ModelStore::new(&config.model_path, &config.metadata_path);
    let model = match store.load() {
        Ok(model) => Some(Arc::new(model)),
        Err(StoreError::NotFound(path)) => {
            tracing::warn!(
                missing = %path.display(),
                "model artifact not built; queries will answer 503 until `build-model` runs"
            );
            None
        }
        Err(e) => return Err(e.into()),
    };

    let state = AppState::new(model, config.default_top_n);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
