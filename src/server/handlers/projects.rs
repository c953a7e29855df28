use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};

use super::Pagination;
use crate::database::entities::projects;
use crate::errors::ApiError;
use crate::server::app::AppState;

/// `GET /api/v1/projects` — paginated, newest first.
pub async fn list_projects(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<projects::Model>>, ApiError> {
    let projects = projects::Entity::find()
        .order_by_desc(projects::Column::CreatedAt)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(&state.db)
        .await?;

    Ok(Json(projects))
}

/// `GET /api/v1/projects/:id`
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<projects::Model>, ApiError> {
    let project = projects::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project not found for id: {id}")))?;

    Ok(Json(project))
}
