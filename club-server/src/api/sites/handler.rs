//! Site API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Site, SiteCreate, SiteUpdate};
use crate::db::repository::SiteRepository;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/sites - 列出所有场馆
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Site>>> {
    let repo = SiteRepository::new(state.db.clone());
    let sites = repo.find_all().await?;
    Ok(Json(sites))
}

/// GET /api/sites/{id} - 获取单个场馆
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Site>> {
    let repo = SiteRepository::new(state.db.clone());
    let site = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Site {}", id)))?;
    Ok(Json(site))
}

/// POST /api/sites - 创建场馆
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SiteCreate>,
) -> AppResult<Json<Site>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.opening_hours, "opening_hours", MAX_SHORT_TEXT_LEN)?;

    let repo = SiteRepository::new(state.db.clone());
    let site = repo.create(payload).await?;
    Ok(Json(site))
}

/// PUT /api/sites/{id} - 更新场馆
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SiteUpdate>,
) -> AppResult<Json<Site>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.opening_hours, "opening_hours", MAX_SHORT_TEXT_LEN)?;

    let repo = SiteRepository::new(state.db.clone());
    let site = repo.update(&id, payload).await?;
    Ok(Json(site))
}

/// DELETE /api/sites/{id} - 删除场馆
///
/// 名下还有空间时拒绝删除 (repository 层校验)。
pub async fn delete_site(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = SiteRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
