//! Application configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign session tokens (HS256).
    pub jwt_secret: String,
    /// Session token lifetime in days.
    #[serde(default = "default_token_expiry_days")]
    pub token_expiry_days: i64,
}

/// Object storage configuration.
///
/// Selected by the `backend` tag: `local` stores files under a directory and
/// serves them from a public base URL, `s3` targets any S3-compatible store
/// (including Cloudflare R2) and issues presigned download URLs.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageSettings {
    /// Local filesystem storage.
    Local {
        /// Base path for stored files.
        #[serde(default = "default_storage_path")]
        base_path: PathBuf,
        /// Base URL for serving files.
        #[serde(default = "default_storage_url")]
        base_url: String,
    },
    /// S3-compatible object storage.
    S3 {
        /// Endpoint URL (e.g., "<https://s3.amazonaws.com>" or an R2 URL).
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Region ("auto" for R2/MinIO).
        #[serde(default = "default_region")]
        region: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Public URL prefix for serving files.
        #[serde(default)]
        public_url: Option<String>,
        /// Path prefix within the bucket.
        #[serde(default)]
        prefix: Option<String>,
    },
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::Local {
            base_path: default_storage_path(),
            base_url: default_storage_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_token_expiry_days() -> i64 {
    7
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./files")
}

fn default_storage_url() -> String {
    "/files".to_string()
}

fn default_region() -> String {
    "auto".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `IMGARENA_ENV`)
    /// 3. Environment variables with `IMGARENA_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("IMGARENA_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("IMGARENA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("IMGARENA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
