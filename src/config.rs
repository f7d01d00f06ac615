use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the static reference tables and model files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_businesses_file")]
    pub businesses_file: String,

    #[serde(default = "default_users_file")]
    pub users_file: String,

    #[serde(default = "default_categories_file")]
    pub categories_file: String,

    #[serde(default = "default_coordinates_file")]
    pub coordinates_file: String,

    /// Latent-factor model bundle (embeddings + biases)
    #[serde(default = "default_model_file")]
    pub model_file: String,

    #[serde(default = "default_user_features_file")]
    pub user_features_file: String,

    #[serde(default = "default_item_features_file")]
    pub item_features_file: String,

    /// Number of recommendations returned when the request doesn't say
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Upper bound on a single scoring call, in milliseconds
    #[serde(default = "default_scoring_timeout_ms")]
    pub scoring_timeout_ms: u64,

    /// User id reserved for new/unknown users in the user index
    #[serde(default = "default_sentinel_user_id")]
    pub sentinel_user_id: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_businesses_file() -> String {
    "businesses.csv".to_string()
}

fn default_users_file() -> String {
    "user_ids.csv".to_string()
}

fn default_categories_file() -> String {
    "business_categories.csv".to_string()
}

fn default_coordinates_file() -> String {
    "city_coordinates.csv".to_string()
}

fn default_model_file() -> String {
    "model.json".to_string()
}

fn default_user_features_file() -> String {
    "user_features.json".to_string()
}

fn default_item_features_file() -> String {
    "item_features.json".to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_scoring_timeout_ms() -> u64 {
    2000
}

fn default_sentinel_user_id() -> String {
    "NUEVO_USUARIO".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Resolves a file name against the data directory
    pub fn data_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_millis(self.scoring_timeout_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
