use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Opaque tenant credential. Unique; immutable once issued. Never
    /// serialized: the project endpoints are unauthenticated, so the key
    /// must not appear on the wire.
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub project_key: String,
    /// Upload ceiling in mebibytes; the effective byte limit is
    /// `max_upload_size << 20`.
    pub max_upload_size: i64,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stored_files::Entity")]
    StoredFiles,
    #[sea_orm(has_many = "super::project_allowed_file_types::Entity")]
    ProjectAllowedFileTypes,
}

impl Related<super::stored_files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoredFiles.def()
    }
}

impl Related<super::project_allowed_file_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectAllowedFileTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
