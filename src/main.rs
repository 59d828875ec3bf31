//! Alumni Registry Backend
//!
//! A REST backend for alumni profile records, persisted as a single JSON
//! document plus one photo file per record.

mod api;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{PhotoStore, Repository};

/// Largest accepted request body; photo uploads are the only large payloads.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Alumni Registry Backend");
    tracing::info!("Document path: {:?}", config.data_path);
    tracing::info!("Photo directory: {:?}", config.photo_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Load the document and prepare photo storage
    let photos = PhotoStore::new(&config.photo_dir);
    let repo = Arc::new(Repository::open(&config.data_path, photos).await?);
    let document = repo.get_document().await;
    if document.is_empty() {
        tracing::info!("Starting with an empty document");
    } else {
        tracing::info!("Serving {} alumni", document.alumni.len());
    }
    tracing::info!(
        "Document at {:?}, photos in {:?}",
        repo.document_path(),
        repo.photos().dir()
    );

    // Create application state
    let state = AppState { repo };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Datastore
        .route("/datastore", get(api::get_datastore))
        .route("/datastore/export", get(api::export_datastore))
        // Alumni
        .route("/alumni", get(api::list_alumni).post(api::create_alumni))
        .route(
            "/alumni/{id}",
            get(api::get_alumni)
                .put(api::update_alumni)
                .delete(api::delete_alumni),
        )
        .route("/alumni/{id}/batch", put(api::reassign_batch))
        // Photos
        .route(
            "/alumni/{id}/photo",
            get(api::get_photo)
                .post(api::upload_photo)
                .put(api::upload_photo),
        )
        .route("/photos/export", get(api::export_photos));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
