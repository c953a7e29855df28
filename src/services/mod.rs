pub mod file_service;
pub mod project_service;

pub use file_service::{DownloadedFile, FileService, NewFileUpload};
pub use project_service::ProjectService;
