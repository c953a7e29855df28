use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recognized MIME type catalog. Immutable reference data; the icon is
/// denormalized onto stored files at upload time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub mime_type: String,
    pub description: Option<String>,
    pub icon: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_allowed_file_types::Entity")]
    ProjectAllowedFileTypes,
}

impl Related<super::project_allowed_file_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectAllowedFileTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
