//! Round trips against a real MongoDB.
//!
//! Requires a server on `MONGODB_URI` (default `mongodb://localhost:27017/`):
//! `cargo test -- --ignored`

use data_api::{
    config::{MongoConfig, DEFAULT_COLLECTION, DEFAULT_MONGODB_URI},
    models::document::from_json,
    Database, DocumentStore,
};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

async fn connect_test_database() -> Database {
    let config = MongoConfig {
        uri: std::env::var("MONGODB_URI").unwrap_or_else(|_| DEFAULT_MONGODB_URI.to_string()),
        database: format!("data_api_test_{}", Uuid::new_v4().simple()),
        collection: DEFAULT_COLLECTION.to_string(),
        connect_timeout: Duration::from_secs(5),
    };

    Database::new(&config)
        .await
        .expect("Failed to connect to MongoDB - ensure it is running")
}

async fn cleanup(db: Database) {
    db.collection()
        .drop(None)
        .await
        .expect("Failed to drop test collection");
    db.shutdown().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB running on MONGODB_URI"]
async fn insert_and_find_all_round_trip() {
    let db = connect_test_database().await;

    assert!(db.find_all_documents().await.unwrap().is_empty());

    db.insert_document(from_json(json!({"name": "a", "value": 1})).unwrap())
        .await
        .expect("Failed to insert document");

    let documents: Vec<Value> = db
        .find_all_documents()
        .await
        .unwrap()
        .into_iter()
        .map(Value::Object)
        .collect();
    assert_eq!(documents, vec![json!({"name": "a", "value": 1})]);

    cleanup(db).await;
}

#[tokio::test]
#[ignore = "Requires MongoDB running on MONGODB_URI"]
async fn generated_ids_are_never_returned() {
    let db = connect_test_database().await;

    for _ in 0..3 {
        db.insert_document(from_json(json!({"nested": {"list": [1, 2.5, "x"]}})).unwrap())
            .await
            .unwrap();
    }

    let documents = db.find_all_documents().await.unwrap();
    assert_eq!(documents.len(), 3);
    assert!(documents.iter().all(|doc| !doc.contains_key("_id")));
    assert_eq!(
        Value::Object(documents[0].clone()),
        json!({"nested": {"list": [1, 2.5, "x"]}})
    );

    cleanup(db).await;
}

#[tokio::test]
#[ignore = "Requires MongoDB running on MONGODB_URI"]
async fn health_check_pings_server() {
    let db = connect_test_database().await;

    tokio_test::assert_ok!(db.health_check().await);

    cleanup(db).await;
}
