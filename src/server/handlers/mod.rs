pub mod files;
pub mod health;
pub mod projects;

use axum::http::HeaderMap;
use serde::Deserialize;

/// Header carrying the tenant project key on upload and download.
pub const PROJECT_KEY_HEADER: &str = "ff-project-key";

/// Project key from the scoping header; empty when absent or unreadable.
/// Emptiness is rejected downstream by the project registry.
pub fn project_key(headers: &HeaderMap) -> &str {
    headers
        .get(PROJECT_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// `limit`/`offset` query contract, defaulting to 10/0 and capped at 100.
#[derive(Debug, Deserialize, Default)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(10).min(100)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}
