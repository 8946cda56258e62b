use axum::{routing::get, Router};

use crate::{
    config::Config,
    handlers::{
        data::{insert_data, list_data},
        health_check, index,
    },
    middleware::create_middleware_stack,
    store::SharedStore,
};

/// Create the Axum router with all endpoints and middleware
pub fn create_router(store: SharedStore, config: &Config) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/data", get(list_data).post(insert_data))
        .with_state(store)
        .layer(create_middleware_stack(config.request_timeout))
}
