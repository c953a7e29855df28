//! Error taxonomy shared by the services and the HTTP layer.
//!
//! `BadRequest` and `NotFound` carry client-visible messages. Everything else
//! is reported generically on the wire and logged with detail server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing/invalid header, oversized body, disallowed MIME type,
    /// malformed id or folder name.
    #[error("{0}")]
    BadRequest(String),

    /// Unknown project key, unknown file id, or a file owned by a different
    /// project than the keyed one. Never distinguished from absence.
    #[error("{0}")]
    NotFound(String),

    /// A persisted record that can no longer be interpreted, e.g. an upload
    /// timestamp that does not parse.
    #[error("corrupt metadata: {0}")]
    CorruptMetadata(String),

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::CorruptMetadata(detail) => {
                error!("corrupt metadata: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Invalid upload time format".to_string(),
                )
            }
            ApiError::Database(err) => {
                error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(err) => {
                error!("internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({
            "result": null,
            "success": false,
            "error": {
                "code": status.as_u16(),
                "message": message,
            },
            "meta": null,
        });

        (status, Json(body)).into_response()
    }
}
