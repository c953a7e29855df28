use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Json, Response},
};
use uuid::Uuid;

use super::{project_key, Pagination};
use crate::database::entities::{projects, stored_files};
use crate::errors::ApiError;
use crate::server::app::AppState;
use crate::services::NewFileUpload;

/// `POST /api/v1/files` — multipart upload with a `file` part and an
/// optional `folder` field, scoped by the project key header.
///
/// Validation is front-loaded: the key and the declared size are checked
/// before the body is consumed, and the MIME type is checked as soon as the
/// file part's headers arrive, before its bytes are buffered.
pub async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<stored_files::Model>, ApiError> {
    let key = project_key(&headers);
    let project = state.projects.resolve_by_key(key).await?;
    let limit_bytes = max_upload_bytes(&project);

    // Reject an oversized declared length before reading anything.
    if let Some(declared) = content_length(&headers) {
        if declared > limit_bytes {
            return Err(oversized(&project));
        }
    }

    let mut folder = String::new();
    let mut upload: Option<NewFileUpload> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(format!("Unable to upload file: {err}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "folder" => {
                folder = field
                    .text()
                    .await
                    .map_err(|err| ApiError::BadRequest(format!("Unable to upload file: {err}")))?;
            }
            "file" if upload.is_none() => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();

                if !state.projects.mime_type_allowed(project.id, &mime_type).await {
                    return Err(ApiError::BadRequest("File type not allowed".to_string()));
                }

                // Buffer the part, aborting as soon as the ceiling is passed
                // so an oversized body is never held in memory.
                let mut data = Vec::new();
                while let Some(chunk) = field.chunk().await.map_err(|err| {
                    ApiError::BadRequest(format!("Unable to upload file: {err}"))
                })? {
                    if (data.len() + chunk.len()) as u64 > limit_bytes {
                        return Err(oversized(&project));
                    }
                    data.extend_from_slice(&chunk);
                }

                let icon = state.projects.icon_for_mime(&mime_type).await;
                upload = Some(NewFileUpload {
                    file_name,
                    mime_type,
                    folder: String::new(),
                    icon,
                    data,
                });
            }
            _ => {}
        }
    }

    let mut upload = upload.ok_or_else(|| ApiError::BadRequest("Unable to get file".to_string()))?;
    upload.folder = folder;

    let stored = state.files.ingest(&project, upload).await?;
    Ok(Json(stored))
}

/// `GET /api/v1/files/:id/download` — decompressed bytes with content
/// headers, scoped by the project key header. Unknown ids and files owned by
/// another project are the same 404.
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let key = project_key(&headers);
    if key.trim().is_empty() {
        return Err(ApiError::BadRequest("Project key is required".to_string()));
    }
    let id = parse_file_id(&id)?;

    let download = state.files.open_download(id, key).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.meta.mime_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                header_safe_file_name(&download.meta.file_name)
            ),
        )
        .header(header::CONTENT_LENGTH, download.bytes.len())
        .header(
            header::LAST_MODIFIED,
            download
                .modified
                .format("%a, %d %b %Y %H:%M:%S GMT")
                .to_string(),
        )
        .body(Body::from(download.bytes))
        .map_err(|err| ApiError::Internal(err.into()))?;

    Ok(response)
}

/// `GET /api/v1/files/:id/info` — metadata only, never blob bytes.
pub async fn file_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<stored_files::Model>, ApiError> {
    let id = parse_file_id(&id)?;
    let stored = state.files.info(id).await?;
    Ok(Json(stored))
}

/// `GET /api/v1/projects/:id/files` — paginated metadata, most recent first.
pub async fn list_project_files(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<stored_files::Model>>, ApiError> {
    let project_id: i32 = project_id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid project ID".to_string()))?;

    let files = state
        .files
        .list_by_project(project_id, pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(files))
}

fn parse_file_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid file ID".to_string()))
}

fn max_upload_bytes(project: &projects::Model) -> u64 {
    (project.max_upload_size.max(0) as u64) << 20
}

fn oversized(project: &projects::Model) -> ApiError {
    ApiError::BadRequest(format!(
        "Unable to upload file: exceeds the {} MiB project limit",
        project.max_upload_size
    ))
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Reduce an untrusted file name to something valid inside a quoted
/// `Content-Disposition` value. Quotes, backslashes, control bytes and
/// non-ASCII characters are replaced so a hostile name can never make the
/// response builder fail or break out of the quoted string.
fn header_safe_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}
