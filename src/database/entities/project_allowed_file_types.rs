use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allow-list entry: one project may ingest one recognized MIME type.
/// Duplicates are tolerated; only existence matters.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_allowed_file_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub file_type_id: i32,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
    #[sea_orm(
        belongs_to = "super::file_types::Entity",
        from = "Column::FileTypeId",
        to = "super::file_types::Column::Id"
    )]
    FileTypes,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::file_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FileTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
