use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
};
use tracing::warn;

use crate::database::entities::{file_types, project_allowed_file_types, projects};
use crate::errors::ApiError;

/// Read-only view of the project registry: key resolution, the MIME
/// allow-list, and the icon catalog.
#[derive(Clone)]
pub struct ProjectService {
    db: DatabaseConnection,
}

impl ProjectService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolve an opaque project key to its project. An empty key fails
    /// before any lookup; an unknown key is reported as absence.
    pub async fn resolve_by_key(&self, key: &str) -> Result<projects::Model, ApiError> {
        if key.trim().is_empty() {
            return Err(ApiError::BadRequest("Project key is required".to_string()));
        }

        projects::Entity::find()
            .filter(projects::Column::ProjectKey.eq(key))
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Project not found for key: {key}")))
    }

    /// Exact, case-sensitive allow-list check. A store error counts as
    /// "not allowed" — never default-allow.
    pub async fn mime_type_allowed(&self, project_id: i32, mime_type: &str) -> bool {
        let result = project_allowed_file_types::Entity::find()
            .join(
                JoinType::InnerJoin,
                project_allowed_file_types::Relation::FileTypes.def(),
            )
            .filter(project_allowed_file_types::Column::ProjectId.eq(project_id))
            .filter(file_types::Column::MimeType.eq(mime_type))
            .one(&self.db)
            .await;

        match result {
            Ok(entry) => entry.is_some(),
            Err(err) => {
                warn!(
                    "allow-list check failed for project {project_id}, \
                     treating {mime_type} as not allowed: {err}"
                );
                false
            }
        }
    }

    /// Best-effort icon lookup for a MIME type; misses and store errors both
    /// degrade to an empty icon.
    pub async fn icon_for_mime(&self, mime_type: &str) -> String {
        let result = file_types::Entity::find()
            .filter(file_types::Column::MimeType.eq(mime_type))
            .one(&self.db)
            .await;

        match result {
            Ok(Some(file_type)) => file_type.icon,
            Ok(None) => String::new(),
            Err(err) => {
                warn!("file type lookup failed for {mime_type}: {err}");
                String::new()
            }
        }
    }
}
