pub mod app;
pub mod handlers;

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use sea_orm_migration::prelude::*;
use tracing::info;

use crate::database::{connection::*, migrations::Migrator, seed_data};

#[derive(Subcommand, Debug)]
pub enum MigrateDirection {
    Up,
    Down,
    Fresh,
}

pub async fn start_server(
    port: u16,
    database_path: &str,
    upload_root: &Path,
    cors_origin: Option<&str>,
) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    Migrator::up(&db, None).await?;
    info!("Database migrations completed");

    seed_data::create_default_data(&db).await?;

    let app = app::create_app(db, upload_root, cors_origin).await?;

    log_routes(port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes(_port: u16) {
    info!("API Endpoints:");
    info!("  /health                          - Health check");
    info!("  POST /api/v1/files               - Upload a file (ff-project-key header)");
    info!("  GET  /api/v1/files/:id/download  - Download a file (ff-project-key header)");
    info!("  GET  /api/v1/files/:id/info      - File metadata");
    info!("  GET  /api/v1/projects            - List projects");
    info!("  GET  /api/v1/projects/:id        - Project detail");
    info!("  GET  /api/v1/projects/:id/files  - List a project's files");
}

pub async fn migrate_database(database_path: &str, direction: MigrateDirection) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    match direction {
        MigrateDirection::Up => {
            info!("Running migrations up");
            Migrator::up(&db, None).await?;
        }
        MigrateDirection::Down => {
            info!("Running migrations down");
            Migrator::down(&db, None).await?;
        }
        MigrateDirection::Fresh => {
            info!("Running fresh migrations (down then up)");
            Migrator::down(&db, None).await?;
            Migrator::up(&db, None).await?;
        }
    }

    info!("Database migration completed");
    Ok(())
}

pub async fn seed_database(database_path: &str) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    Migrator::up(&db, None).await?;
    seed_data::create_default_data(&db).await?;

    info!("Database seeding completed");
    Ok(())
}
