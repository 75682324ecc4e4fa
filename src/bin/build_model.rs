//! Offline build entrypoint: reads a cleaned catalog CSV, builds the
//! similarity matrix, and persists the model artifact. A rebuild always
//! produces a fresh artifact; nothing is patched in place.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinerec_api::{config::Config, engine, models::load_catalog, store::ModelStore};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let catalog_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.catalog_path.clone());

    tracing::info!(catalog = %catalog_path, "loading catalog");
    let movies = load_catalog(&catalog_path)?;
    if movies.is_empty() {
        tracing::warn!("catalog is empty; the artifact will serve no recommendations");
    }

    tracing::info!(movies = movies.len(), "building similarity matrix");
    let matrix = engine::build_model(&movies);

    let store = ModelStore::new(&config.model_path, &config.metadata_path);
    store
        .save(&matrix, &movies)
        .context("failed to persist model artifact")?;

    Ok(())
}
