//! Space API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use surrealdb::RecordId;

use crate::core::ServerState;
use crate::db::models::{Space, SpaceCreate, SpaceUpdate};
use crate::db::repository::{SiteRepository, SpaceRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SpaceFilterQuery {
    /// 按场馆过滤 (site record id)
    pub site: Option<String>,
}

/// GET /api/spaces?site= - 列出空间（可按场馆过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<SpaceFilterQuery>,
) -> AppResult<Json<Vec<Space>>> {
    let repo = SpaceRepository::new(state.db.clone());
    let spaces = match filter.site {
        Some(site) => {
            let thing: RecordId = site
                .parse()
                .map_err(|_| AppError::validation(format!("Invalid site ID: {}", site)))?;
            repo.find_by_site(thing).await?
        }
        None => repo.find_all().await?,
    };
    Ok(Json(spaces))
}

/// GET /api/spaces/{id} - 获取单个空间
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Space>> {
    let repo = SpaceRepository::new(state.db.clone());
    let space = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Space {}", id)))?;
    Ok(Json(space))
}

/// POST /api/spaces - 创建空间
///
/// 所属场馆必须存在。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SpaceCreate>,
) -> AppResult<Json<Space>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.kind, "kind", MAX_SHORT_TEXT_LEN)?;
    if payload.capacity == 0 {
        return Err(AppError::validation("capacity must be at least 1"));
    }

    let site_repo = SiteRepository::new(state.db.clone());
    if site_repo
        .find_by_id(&payload.site.to_string())
        .await?
        .is_none()
    {
        return Err(AppError::not_found(format!("Site {}", payload.site)));
    }

    let repo = SpaceRepository::new(state.db.clone());
    let space = repo.create(payload).await?;
    Ok(Json(space))
}

/// PUT /api/spaces/{id} - 更新空间
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SpaceUpdate>,
) -> AppResult<Json<Space>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.kind, "kind", MAX_SHORT_TEXT_LEN)?;
    if payload.capacity == Some(0) {
        return Err(AppError::validation("capacity must be at least 1"));
    }

    let repo = SpaceRepository::new(state.db.clone());
    let space = repo.update(&id, payload).await?;
    Ok(Json(space))
}

/// DELETE /api/spaces/{id} - 删除空间
///
/// 仍被课程模板引用时拒绝删除 (repository 层校验)。
pub async fn delete_space(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = SpaceRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
