// Library root for the data API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use error::{ApiError, ApiResult};
pub use models::JsonDocument;
pub use routes::create_router;
pub use store::{DocumentStore, MemoryStore, SharedStore};
