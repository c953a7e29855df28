use std::path::Path;

use anyhow::anyhow;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use tracing::error;
use uuid::Uuid;

use crate::database::entities::{projects, stored_files};
use crate::errors::ApiError;
use crate::storage::{codec, BlobStore};

/// Suffix for compressed blobs on disk.
const STORAGE_SUFFIX: &str = ".ffs";

/// Upper bound on a single metadata page.
const MAX_PAGE_SIZE: u64 = 100;

/// A validated upload ready to be persisted. The MIME type has already been
/// checked against the project allow-list and the icon resolved best-effort.
pub struct NewFileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub folder: String,
    pub icon: String,
    pub data: Vec<u8>,
}

/// A decompressed file together with its metadata, ready to serve.
#[derive(Debug)]
pub struct DownloadedFile {
    pub meta: stored_files::Model,
    pub modified: DateTime<Utc>,
    pub bytes: Vec<u8>,
}

/// Ingestion and retrieval pipelines over the metadata store and the blob
/// store. One instance is shared by all requests; every call is independent.
#[derive(Clone)]
pub struct FileService {
    db: DatabaseConnection,
    blobs: BlobStore,
}

impl FileService {
    pub fn new(db: DatabaseConnection, blobs: BlobStore) -> Self {
        Self { db, blobs }
    }

    /// Persist an upload: metadata row first, then the compressed blob.
    ///
    /// The two writes are not transactional. A blob-write failure is returned
    /// as an internal error but the metadata row is not rolled back; the
    /// orphan is logged with the file id. Callers must treat a success
    /// response as the only proof of full durability.
    pub async fn ingest(
        &self,
        project: &projects::Model,
        upload: NewFileUpload,
    ) -> Result<stored_files::Model, ApiError> {
        let folder = validate_folder(&upload.folder)?;
        let saved_as = format!("{}{}", Uuid::new_v4(), STORAGE_SUFFIX);

        let record = stored_files::ActiveModel {
            id: Set(Uuid::new_v4()),
            file_name: Set(upload.file_name.clone()),
            file_size: Set(upload.data.len() as i64),
            mime_type: Set(upload.mime_type),
            folder: Set(folder.clone()),
            saved_as: Set(saved_as.clone()),
            original_extension: Set(file_extension(&upload.file_name)),
            project_id: Set(project.id),
            icon: Set(upload.icon),
            // fixed-width RFC 3339 so lexicographic order is chronological
            uploaded_at: Set(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        };

        // Metadata failure is fatal; no blob write is attempted.
        let stored = record.insert(&self.db).await?;

        let blobs = self.blobs.clone();
        let data = upload.data;
        let write_result = tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let compressed = codec::compress(&data)?;
            blobs.write(&folder, &saved_as, &compressed)?;
            Ok(())
        })
        .await
        .map_err(|err| ApiError::Internal(anyhow!("blob write task failed: {err}")))?;

        if let Err(err) = write_result {
            error!(
                "blob write failed for file {}, metadata record is orphaned: {err:#}",
                stored.id
            );
            return Err(ApiError::Internal(err));
        }

        Ok(stored)
    }

    /// Key-scoped lookup plus full decompression. A file belonging to a
    /// different project is indistinguishable from an unknown id.
    pub async fn open_download(
        &self,
        id: Uuid,
        project_key: &str,
    ) -> Result<DownloadedFile, ApiError> {
        let stored = stored_files::Entity::find_by_id(id)
            .join(JoinType::InnerJoin, stored_files::Relation::Projects.def())
            .filter(projects::Column::ProjectKey.eq(project_key))
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Unable to find file with id: {id}")))?;

        let modified = DateTime::parse_from_rfc3339(&stored.uploaded_at)
            .map_err(|err| {
                ApiError::CorruptMetadata(format!(
                    "stored file {id} has an unparseable upload timestamp: {err}"
                ))
            })?
            .with_timezone(&Utc);

        let blobs = self.blobs.clone();
        let folder = stored.folder.clone();
        let saved_as = stored.saved_as.clone();
        let bytes = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<u8>> {
            let blob = blobs.open(&folder, &saved_as)?;
            let mut out = Vec::new();
            codec::decompress_to(std::io::BufReader::new(blob), &mut out)?;
            Ok(out)
        })
        .await
        .map_err(|err| ApiError::Internal(anyhow!("blob read task failed: {err}")))?
        .map_err(|err| {
            error!("failed to read blob for file {id}: {err:#}");
            ApiError::Internal(err)
        })?;

        Ok(DownloadedFile {
            meta: stored,
            modified,
            bytes,
        })
    }

    /// Metadata page for one project, most recent first.
    pub async fn list_by_project(
        &self,
        project_id: i32,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<stored_files::Model>, ApiError> {
        let page = stored_files::Entity::find()
            .filter(stored_files::Column::ProjectId.eq(project_id))
            .order_by_desc(stored_files::Column::UploadedAt)
            .limit(limit.min(MAX_PAGE_SIZE))
            .offset(offset)
            .all(&self.db)
            .await?;

        Ok(page)
    }

    pub async fn info(&self, id: Uuid) -> Result<stored_files::Model, ApiError> {
        stored_files::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Unable to find file with id: {id}")))
    }
}

/// A folder is an untrusted caller-supplied namespace: it must be a single
/// path segment, so separators and dot-segments are rejected outright.
fn validate_folder(folder: &str) -> Result<String, ApiError> {
    let folder = folder.trim();
    if folder.is_empty() {
        return Ok(String::new());
    }

    let safe_chars = folder
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !safe_chars || folder == "." || folder == ".." {
        return Err(ApiError::BadRequest(format!(
            "Invalid folder name: {folder}"
        )));
    }

    Ok(folder.to_string())
}

/// Extension of the original file name, dot included; empty when absent.
fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
