pub mod file_types;
pub mod project_allowed_file_types;
pub mod projects;
pub mod stored_files;
