use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the binary similarity-matrix blob
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Path to the movie metadata table
    #[serde(default = "default_metadata_path")]
    pub metadata_path: String,

    /// Path to the cleaned catalog consumed by the build entrypoint
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations returned when the caller does not ask
    /// for a specific count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

fn default_model_path() -> String {
    "models/recommendation_model.bin".to_string()
}

fn default_metadata_path() -> String {
    "models/movie_metadata.csv".to_string()
}

fn default_catalog_path() -> String {
    "data/movies.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_n() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
