use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of affinity groups the catalog is partitioned into
    #[serde(default = "default_cluster_count")]
    pub cluster_count: usize,

    /// Number of movies returned when the client does not ask for a count
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cluster_count() -> usize {
    5
}

fn default_recommendation_count() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cluster_count: default_cluster_count(),
            recommendation_count: default_recommendation_count(),
        }
    }
}
