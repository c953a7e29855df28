use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One uploaded file. Append-only: `id` and `saved_as` are assigned at
/// creation and never mutated, and the blob on disk is located by
/// `(folder, saved_as)` — never by `id` or the user-supplied name.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stored_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Original user-supplied name; display and extension derivation only.
    #[serde(rename = "name")]
    pub file_name: String,
    #[serde(rename = "size")]
    pub file_size: i64,
    /// As declared by the uploader; validated against the allow-list but not
    /// sniffed from content.
    pub mime_type: String,
    pub folder: String,
    /// Server-generated storage name, decoupled from `file_name`.
    pub saved_as: String,
    pub original_extension: String,
    pub project_id: i32,
    pub icon: String,
    /// RFC 3339 text. Kept as text so a malformed value surfaces as a
    /// corrupt-metadata condition at read time instead of a decode panic.
    pub uploaded_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
