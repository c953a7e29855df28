use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create projects table
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Projects::Name).text().not_null())
                    .col(ColumnDef::new(Projects::Description).text())
                    .col(ColumnDef::new(Projects::ProjectKey).text().not_null().unique_key())
                    .col(ColumnDef::new(Projects::MaxUploadSize).big_integer().not_null())
                    .col(ColumnDef::new(Projects::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create file_types catalog
        manager
            .create_table(
                Table::create()
                    .table(FileTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FileTypes::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(FileTypes::Name).text().not_null())
                    .col(ColumnDef::new(FileTypes::MimeType).text().not_null())
                    .col(ColumnDef::new(FileTypes::Description).text())
                    .col(ColumnDef::new(FileTypes::Icon).text().not_null())
                    .col(ColumnDef::new(FileTypes::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create project allow-list association
        manager
            .create_table(
                Table::create()
                    .table(ProjectAllowedFileTypes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProjectAllowedFileTypes::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(ProjectAllowedFileTypes::ProjectId).integer().not_null())
                    .col(ColumnDef::new(ProjectAllowedFileTypes::FileTypeId).integer().not_null())
                    .col(ColumnDef::new(ProjectAllowedFileTypes::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_allowed_file_types_project_id")
                            .from(ProjectAllowedFileTypes::Table, ProjectAllowedFileTypes::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_allowed_file_types_file_type_id")
                            .from(ProjectAllowedFileTypes::Table, ProjectAllowedFileTypes::FileTypeId)
                            .to(FileTypes::Table, FileTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create stored_files table
        manager
            .create_table(
                Table::create()
                    .table(StoredFiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StoredFiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(StoredFiles::FileName).text().not_null())
                    .col(ColumnDef::new(StoredFiles::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(StoredFiles::MimeType).text().not_null())
                    .col(ColumnDef::new(StoredFiles::Folder).text().not_null())
                    .col(ColumnDef::new(StoredFiles::SavedAs).text().not_null())
                    .col(ColumnDef::new(StoredFiles::OriginalExtension).text().not_null())
                    .col(ColumnDef::new(StoredFiles::ProjectId).integer().not_null())
                    .col(ColumnDef::new(StoredFiles::Icon).text().not_null())
                    .col(ColumnDef::new(StoredFiles::UploadedAt).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stored_files_project_id")
                            .from(StoredFiles::Table, StoredFiles::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes for the hot lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_stored_files_project_id")
                    .table(StoredFiles::Table)
                    .col(StoredFiles::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stored_files_uploaded_at")
                    .table(StoredFiles::Table)
                    .col(StoredFiles::UploadedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_allowed_file_types_project_id")
                    .table(ProjectAllowedFileTypes::Table)
                    .col(ProjectAllowedFileTypes::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_file_types_mime_type")
                    .table(FileTypes::Table)
                    .col(FileTypes::MimeType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StoredFiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProjectAllowedFileTypes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FileTypes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Name,
    Description,
    ProjectKey,
    MaxUploadSize,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FileTypes {
    Table,
    Id,
    Name,
    MimeType,
    Description,
    Icon,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProjectAllowedFileTypes {
    Table,
    Id,
    ProjectId,
    FileTypeId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StoredFiles {
    Table,
    Id,
    FileName,
    FileSize,
    MimeType,
    Folder,
    SavedAs,
    OriginalExtension,
    ProjectId,
    Icon,
    UploadedAt,
}
