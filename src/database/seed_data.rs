use anyhow::Result;
use chrono::Utc;
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::database::entities::{file_types, project_allowed_file_types, projects};

/// Seed the file type catalog and a default project. Safe to call on every
/// start; existing data is left untouched.
pub async fn create_default_data(db: &DatabaseConnection) -> Result<()> {
    seed_file_types(db).await?;
    seed_default_project(db).await?;
    Ok(())
}

async fn seed_file_types(db: &DatabaseConnection) -> Result<()> {
    let existing = file_types::Entity::find().one(db).await?;
    if existing.is_some() {
        info!("File type catalog already seeded, skipping");
        return Ok(());
    }

    info!("Seeding file type catalog");

    let catalog = vec![
        ("PNG image", "image/png", "Portable Network Graphics", "image"),
        ("JPEG image", "image/jpeg", "JPEG image", "image"),
        ("GIF image", "image/gif", "Graphics Interchange Format", "image"),
        ("PDF document", "application/pdf", "Portable Document Format", "pdf"),
        ("Plain text", "text/plain", "Plain text", "text"),
        ("CSV document", "text/csv", "Comma-separated values", "table"),
        ("JSON document", "application/json", "JSON data", "code"),
        ("ZIP archive", "application/zip", "ZIP compressed archive", "archive"),
        ("MP4 video", "video/mp4", "MPEG-4 video", "video"),
    ];

    let now = Utc::now();
    let models: Vec<file_types::ActiveModel> = catalog
        .into_iter()
        .map(|(name, mime_type, description, icon)| file_types::ActiveModel {
            name: Set(name.to_string()),
            mime_type: Set(mime_type.to_string()),
            description: Set(Some(description.to_string())),
            icon: Set(icon.to_string()),
            created_at: Set(now),
            ..Default::default()
        })
        .collect();

    file_types::Entity::insert_many(models).exec(db).await?;
    info!("File type catalog seeded");
    Ok(())
}

async fn seed_default_project(db: &DatabaseConnection) -> Result<()> {
    let existing = projects::Entity::find()
        .filter(projects::Column::Name.eq("Default Project"))
        .one(db)
        .await?;
    if existing.is_some() {
        info!("Default project already exists, skipping seed data creation");
        return Ok(());
    }

    let project_key = Uuid::new_v4().to_string();
    info!("Seeding default project");

    let project = projects::ActiveModel {
        name: Set("Default Project".to_string()),
        description: Set(Some("Default project for the organisation".to_string())),
        project_key: Set(project_key.clone()),
        max_upload_size: Set(50),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let project = project.insert(db).await?;

    // Starter allow-list: images and PDFs
    let starter_mime_types = ["image/png", "image/jpeg", "image/gif", "application/pdf"];
    let allowed = file_types::Entity::find()
        .filter(file_types::Column::MimeType.is_in(starter_mime_types))
        .all(db)
        .await?;

    let now = Utc::now();
    for file_type in allowed {
        let entry = project_allowed_file_types::ActiveModel {
            project_id: Set(project.id),
            file_type_id: Set(file_type.id),
            created_at: Set(now),
            ..Default::default()
        };
        entry.insert(db).await?;
    }

    info!(
        "Default project seeded with key {} (id {})",
        project_key, project.id
    );
    Ok(())
}
