/// Configuration management
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub database_max_connections: u32,
    pub cors_origin: Option<String>,

    pub access_token_secret: String,
    pub refresh_token_secret: String,
    #[serde(default = "default_access_ttl_minutes")]
    pub access_token_ttl_minutes: i64,
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_token_ttl_days: i64,

    pub s3_bucket: String,
    #[serde(default = "default_s3_region")]
    pub s3_region: String,
    /// Base URL prefix for uploaded objects; defaults to the virtual-hosted
    /// S3 URL for the configured bucket and region.
    pub s3_public_base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_access_ttl_minutes() -> i64 {
    15
}

fn default_refresh_ttl_days() -> i64 {
    10
}

fn default_s3_region() -> String {
    "us-east-1".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}
