//! Asset API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::audit::{AuditAction, create_diff, create_snapshot};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Asset, AssetCreate, AssetStatus, AssetUpdate, SpaceId};
use crate::db::repository::{AssetRepository, SpaceRepository};
use crate::utils::time::parse_date;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct AssetFilterQuery {
    pub status: Option<AssetStatus>,
}

/// GET /api/assets?status= - 列出器材
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<AssetFilterQuery>,
) -> AppResult<Json<Vec<Asset>>> {
    let repo = AssetRepository::new(state.db.clone());
    let assets = repo.find_all(filter.status).await?;
    Ok(Json(assets))
}

/// GET /api/assets/{id} - 获取单个器材
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Asset>> {
    let repo = AssetRepository::new(state.db.clone());
    let asset = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Asset {}", id)))?;
    Ok(Json(asset))
}

/// POST /api/assets - 登记器材
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<AssetCreate>,
) -> AppResult<Json<Asset>> {
    validate_asset_fields(
        Some(&payload.name),
        &payload.category,
        &payload.serial_number,
        &payload.purchased_at,
        &payload.note,
    )?;
    require_space_exists(&state, &payload.space).await?;

    let repo = AssetRepository::new(state.db.clone());
    let asset = repo.create(payload).await?;

    let id = asset.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    state
        .audit
        .log(
            AuditAction::AssetCreated,
            "asset",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            create_snapshot(&asset, "asset"),
        )
        .await;

    Ok(Json(asset))
}

/// PUT /api/assets/{id} - 更新器材
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<AssetUpdate>,
) -> AppResult<Json<Asset>> {
    validate_asset_fields(
        payload.name.as_deref(),
        &payload.category,
        &payload.serial_number,
        &payload.purchased_at,
        &payload.note,
    )?;
    require_space_exists(&state, &payload.space).await?;

    let repo = AssetRepository::new(state.db.clone());
    let old = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Asset {}", id)))?;

    let asset = repo.update(&id, payload).await?;

    state
        .audit
        .log(
            AuditAction::AssetUpdated,
            "asset",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            create_diff(&old, &asset, "asset"),
        )
        .await;

    Ok(Json(asset))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: AssetStatus,
}

/// POST /api/assets/{id}/status - 手动调整器材状态
///
/// 报废走专门的 /retire 端点；维修流转一般由工单驱动，
/// 这里留给人工纠偏。
pub async fn set_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<Asset>> {
    if req.status == AssetStatus::Retired {
        return Err(AppError::validation(
            "Use the retire endpoint to retire an asset",
        ));
    }

    let repo = AssetRepository::new(state.db.clone());
    let old = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Asset {}", id)))?;

    let asset = repo.set_status(&id, req.status).await?;

    state
        .audit
        .log(
            AuditAction::AssetUpdated,
            "asset",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            create_diff(&old, &asset, "asset"),
        )
        .await;

    Ok(Json(asset))
}

/// POST /api/assets/{id}/retire - 报废器材（终态）
pub async fn retire(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Asset>> {
    let repo = AssetRepository::new(state.db.clone());
    let asset = repo.retire(&id).await?;

    state
        .audit
        .log(
            AuditAction::AssetRetired,
            "asset",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({ "asset_name": asset.name }),
        )
        .await;

    Ok(Json(asset))
}

async fn require_space_exists(state: &ServerState, space: &Option<SpaceId>) -> AppResult<()> {
    if let Some(space) = space
        && SpaceRepository::new(state.db.clone())
            .find_by_id(&space.to_string())
            .await?
            .is_none()
    {
        return Err(AppError::not_found(format!("Space {}", space)));
    }
    Ok(())
}

fn validate_asset_fields(
    name: Option<&str>,
    category: &Option<String>,
    serial_number: &Option<String>,
    purchased_at: &Option<String>,
    note: &Option<String>,
) -> AppResult<()> {
    if let Some(name) = name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(serial_number, "serial_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(note, "note", MAX_NOTE_LEN)?;
    if let Some(date) = purchased_at {
        parse_date(date)?;
    }
    Ok(())
}
