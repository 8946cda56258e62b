use crate::config::MongoConfig;
use crate::error::ApiError;
use crate::models::document::{self, JsonDocument};
use crate::store::DocumentStore;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, FindOptions},
    Client, Collection,
};
use tracing::{error, info};

const APP_NAME: &str = "data-api";

/// MongoDB-backed document store.
/// One driver `Client` shared by all requests; pooling is internal to the driver.
#[derive(Clone)]
pub struct Database {
    client: Client,
    collection: Collection<Document>,
}

impl Database {
    /// Builds the client from the connection string and pings the server once.
    ///
    /// # Arguments
    /// * `config` - The MongoDB configuration
    ///
    /// # Returns
    /// * `Result<Self, ApiError>` - Database instance or error
    pub async fn new(config: &MongoConfig) -> Result<Self, ApiError> {
        info!(
            database = %config.database,
            collection = %config.collection,
            "Connecting to MongoDB"
        );

        let db = Self::connect_lazy(config).await?;
        db.test_connection().await?;

        Ok(db)
    }

    /// Builds the client without contacting the server; the driver dials on
    /// first use.
    pub async fn connect_lazy(config: &MongoConfig) -> Result<Self, ApiError> {
        let client = Self::create_client(config).await?;
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        Ok(Database { client, collection })
    }

    async fn create_client(config: &MongoConfig) -> Result<Client, ApiError> {
        let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            error!("Failed to parse MONGODB_URI: {}", e);
            ApiError::from(e)
        })?;

        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(config.connect_timeout);
        options.connect_timeout = Some(config.connect_timeout);

        Client::with_options(options).map_err(|e| {
            error!("Failed to create MongoDB client: {}", e);
            ApiError::from(e)
        })
    }

    async fn ping(&self) -> Result<(), ApiError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    /// Same ping as `health_check`, logged as the startup connectivity check.
    pub async fn test_connection(&self) -> Result<(), ApiError> {
        self.ping().await.map_err(|e| {
            error!("Database connection test failed: {}", e);
            e
        })?;

        info!("Database connection test successful");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }
}

#[async_trait]
impl DocumentStore for Database {
    async fn insert_document(&self, json: JsonDocument) -> Result<(), ApiError> {
        let bson = document::to_bson(&json)?;

        let result = self.collection.insert_one(bson, None).await.map_err(|e| {
            error!("Failed to insert document: {}", e);
            ApiError::from(e)
        })?;

        info!("Inserted document with id: {}", result.inserted_id);
        Ok(())
    }

    /// `find({}, {_id: 0})`: the projection drops the identifier server-side and
    /// `from_bson` strips it again in case a projection is ever bypassed.
    async fn find_all_documents(&self) -> Result<Vec<JsonDocument>, ApiError> {
        let options = FindOptions::builder()
            .projection(doc! { "_id": 0 })
            .build();

        let cursor = self.collection.find(doc! {}, options).await.map_err(|e| {
            error!("Failed to query documents: {}", e);
            ApiError::from(e)
        })?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            error!("Failed to read document cursor: {}", e);
            ApiError::from(e)
        })?;

        Ok(documents.into_iter().map(document::from_bson).collect())
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        self.ping().await.map_err(|e| {
            error!("Database health check failed: {}", e);
            e
        })
    }

    async fn shutdown(&self) {
        info!("Closing MongoDB connections");
        self.client.clone().shutdown().await;
    }
}
