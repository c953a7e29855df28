use std::path::Path;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{files, health, projects};
use crate::services::{FileService, ProjectService};
use crate::storage::BlobStore;

/// Shared request state. The registry, metadata and blob stores are injected
/// here once at startup; handlers never reach for global state.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub projects: ProjectService,
    pub files: FileService,
}

pub async fn create_app(
    db: DatabaseConnection,
    upload_root: &Path,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let blobs = BlobStore::new(upload_root);
    let state = AppState {
        projects: ProjectService::new(db.clone()),
        files: FileService::new(db.clone(), blobs),
        db,
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        // Upload bodies are capped per project while streaming, not globally
        .layer(DefaultBodyLimit::disable())
        // Add middleware
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // File routes
        .route("/files", post(files::upload_file))
        .route("/files/:id/download", get(files::download_file))
        .route("/files/:id/info", get(files::file_info))
        // Project routes
        .route("/projects", get(projects::list_projects))
        .route("/projects/:id", get(projects::get_project))
        .route("/projects/:id/files", get(files::list_project_files))
}
