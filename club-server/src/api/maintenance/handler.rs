//! Maintenance API Handlers
//!
//! 工单与器材状态联动：开单 → 器材 IN_MAINTENANCE；
//! 该器材最后一张未结工单关闭/作废 → 器材回 OPERATIONAL。

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use shared::ErrorCode;
use surrealdb::RecordId;

use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    AssetStatus, MaintenanceClose, MaintenanceCreate, MaintenanceRecord, MaintenanceStatus,
};
use crate::db::repository::{AssetRepository, MaintenanceRepository};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct MaintenanceFilterQuery {
    pub asset: Option<String>,
    pub status: Option<MaintenanceStatus>,
}

/// GET /api/maintenance?asset=&status= - 列出工单
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<MaintenanceFilterQuery>,
) -> AppResult<Json<Vec<MaintenanceRecord>>> {
    let asset = match filter.asset {
        Some(raw) => Some(
            raw.parse::<RecordId>()
                .map_err(|_| AppError::validation(format!("Invalid asset ID: {}", raw)))?,
        ),
        None => None,
    };

    let repo = MaintenanceRepository::new(state.db.clone());
    let records = repo.find_all(asset, filter.status).await?;
    Ok(Json(records))
}

/// GET /api/maintenance/{id} - 获取单个工单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MaintenanceRecord>> {
    let repo = MaintenanceRepository::new(state.db.clone());
    let record = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Maintenance record {}", id)))?;
    Ok(Json(record))
}

/// POST /api/maintenance - 开维修工单
///
/// 器材随之进入 IN_MAINTENANCE。报废器材不能开单。
pub async fn open(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<MaintenanceCreate>,
) -> AppResult<Json<MaintenanceRecord>> {
    validate_required_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let asset_repo = AssetRepository::new(state.db.clone());
    let asset = asset_repo
        .find_by_id(&payload.asset.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Asset {}", payload.asset)))?;
    if asset.status == AssetStatus::Retired {
        return Err(AppError::with_message(
            ErrorCode::AssetRetired,
            "Retired assets cannot be put in maintenance",
        ));
    }

    let reported_by: Option<RecordId> = current_user.id.parse().ok();
    let repo = MaintenanceRepository::new(state.db.clone());
    let record = repo
        .create(
            payload.asset.clone(),
            asset.name.clone(),
            payload.kind,
            payload.description,
            reported_by,
            Some(current_user.display_name.clone()),
        )
        .await?;

    if asset.status == AssetStatus::Operational {
        asset_repo
            .set_status(&payload.asset.to_string(), AssetStatus::InMaintenance)
            .await?;
    }

    let id = record
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    state
        .audit
        .log(
            AuditAction::MaintenanceOpened,
            "maintenance_record",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "asset_name": record.asset_name,
                "kind": record.kind,
                "description": record.description,
            }),
        )
        .await;

    Ok(Json(record))
}

/// POST /api/maintenance/{id}/start - 开始维修
pub async fn start(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MaintenanceRecord>> {
    let repo = MaintenanceRepository::new(state.db.clone());
    let record = repo.start(&id).await?;

    state
        .audit
        .log(
            AuditAction::MaintenanceStarted,
            "maintenance_record",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({ "asset_name": record.asset_name }),
        )
        .await;

    Ok(Json(record))
}

/// POST /api/maintenance/{id}/close - 关单（含维修结论和费用）
pub async fn close(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<MaintenanceClose>,
) -> AppResult<Json<MaintenanceRecord>> {
    validate_optional_text(&payload.resolution, "resolution", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.technician, "technician", MAX_NOTE_LEN)?;
    if let Some(cost) = payload.cost
        && cost.is_sign_negative()
    {
        return Err(AppError::validation("cost must not be negative"));
    }

    let repo = MaintenanceRepository::new(state.db.clone());
    let record = repo.close(&id, payload).await?;

    restore_asset_if_done(&state, &record).await?;

    state
        .audit
        .log(
            AuditAction::MaintenanceClosed,
            "maintenance_record",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "asset_name": record.asset_name,
                "resolution": record.resolution,
                "technician": record.technician,
                "cost": record.cost,
            }),
        )
        .await;

    Ok(Json(record))
}

/// POST /api/maintenance/{id}/cancel - 作废工单（误报、重复报修）
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MaintenanceRecord>> {
    let repo = MaintenanceRepository::new(state.db.clone());
    let record = repo.cancel(&id).await?;

    restore_asset_if_done(&state, &record).await?;

    state
        .audit
        .log(
            AuditAction::MaintenanceCancelled,
            "maintenance_record",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({ "asset_name": record.asset_name }),
        )
        .await;

    Ok(Json(record))
}

/// 该器材没有任何未结工单时恢复 OPERATIONAL
async fn restore_asset_if_done(
    state: &ServerState,
    record: &MaintenanceRecord,
) -> AppResult<()> {
    let repo = MaintenanceRepository::new(state.db.clone());
    if repo.count_open_for_asset(record.asset.clone()).await? > 0 {
        return Ok(());
    }

    let asset_repo = AssetRepository::new(state.db.clone());
    let asset = asset_repo.find_by_id(&record.asset.to_string()).await?;
    if let Some(asset) = asset
        && asset.status == AssetStatus::InMaintenance
    {
        asset_repo
            .set_status(&record.asset.to_string(), AssetStatus::Operational)
            .await?;
    }
    Ok(())
}
