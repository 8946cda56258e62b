use std::env;
use std::time::Duration;
use anyhow::{Context, Result};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DATABASE: &str = "flask_db";
pub const DEFAULT_COLLECTION: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub request_timeout: Duration,
    pub backend: StorageBackend,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub connect_timeout: Duration,
}

/// Which `DocumentStore` implementation the process runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MongoDb,
    /// Process-local, lost on restart. Handy for local runs without a database.
    Memory,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so parsing can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let request_timeout_secs = lookup("REQUEST_TIMEOUT")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT must be a valid number of seconds")?;

        let backend = StorageBackend::parse(
            &lookup("STORAGE_BACKEND").unwrap_or_else(|| "mongodb".to_string()),
        )?;

        let mongodb = MongoConfig::from_lookup(&lookup)?;

        let config = Config {
            port,
            request_timeout: Duration::from_secs(request_timeout_secs),
            backend,
            mongodb,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        if self.request_timeout.as_secs() == 0 {
            anyhow::bail!("REQUEST_TIMEOUT must be greater than 0");
        }

        // The URI is only dialled for the mongodb backend, but a broken value is
        // still worth reporting early.
        self.mongodb.validate()?;

        Ok(())
    }
}

impl MongoConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string());

        let database = lookup("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let collection =
            lookup("MONGODB_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        let connect_timeout_secs = lookup("MONGODB_CONNECT_TIMEOUT")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u64>()
            .context("MONGODB_CONNECT_TIMEOUT must be a valid number of seconds")?;

        Ok(MongoConfig {
            uri,
            database,
            collection,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.uri.starts_with("mongodb://") && !self.uri.starts_with("mongodb+srv://") {
            anyhow::bail!("MONGODB_URI must start with 'mongodb://' or 'mongodb+srv://'");
        }

        if self.database.trim().is_empty() {
            anyhow::bail!("MONGODB_DATABASE cannot be empty");
        }

        if self.collection.trim().is_empty() {
            anyhow::bail!("MONGODB_COLLECTION cannot be empty");
        }

        if self.connect_timeout.as_secs() == 0 {
            anyhow::bail!("MONGODB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }
}

impl StorageBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Invalid STORAGE_BACKEND '{}'. Must be one of: mongodb, memory", other),
        }
    }
}
