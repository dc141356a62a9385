//! Session API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{ClassSession, Reservation};
use crate::db::repository::{ClassSessionRepository, ReservationRepository};
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SessionFilterQuery {
    /// 起始日期 (YYYY-MM-DD, 含)
    pub from: String,
    /// 结束日期 (YYYY-MM-DD, 含)
    pub to: String,
    pub template: Option<String>,
    pub space: Option<String>,
    /// 活动名称模糊匹配
    pub activity: Option<String>,
}

/// 课次详情：课次本身 + 预约名单
#[derive(Debug, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: ClassSession,
    pub reservations: Vec<Reservation>,
    /// 当前占用名额数
    pub active_reservations: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct CancelSessionRequest {
    pub reason: Option<String>,
}

/// GET /api/sessions?from=&to=&template=&space=&activity= - 按日期区间查课次
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<SessionFilterQuery>,
) -> AppResult<Json<Vec<ClassSession>>> {
    parse_date(&filter.from)?;
    parse_date(&filter.to)?;

    let template = parse_optional_id(filter.template, "template")?;
    let space = parse_optional_id(filter.space, "space")?;

    let repo = ClassSessionRepository::new(state.db.clone());
    let sessions = repo
        .find_in_range(&filter.from, &filter.to, template, space, filter.activity)
        .await?;
    Ok(Json(sessions))
}

/// GET /api/sessions/{id} - 课次详情（含预约名单）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SessionDetail>> {
    let repo = ClassSessionRepository::new(state.db.clone());
    let session = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Session {}", id)))?;

    let session_id = session
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Session missing ID"))?;
    let reservation_repo = ReservationRepository::new(state.db.clone());
    let reservations = reservation_repo
        .find_by_session(session_id.clone(), false)
        .await?;
    let active_reservations = reservation_repo
        .count_active_by_session(session_id)
        .await?;

    Ok(Json(SessionDetail {
        session,
        reservations,
        active_reservations,
    }))
}

/// POST /api/sessions/{id}/cancel - 取消课次
///
/// 同时取消名下所有占用名额的预约，预约方可另约他课。
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<CancelSessionRequest>,
) -> AppResult<Json<ClassSession>> {
    let repo = ClassSessionRepository::new(state.db.clone());
    let session = repo.cancel(&id, req.reason.clone()).await?;

    let session_id = session
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Session missing ID"))?;
    let reservation_repo = ReservationRepository::new(state.db.clone());
    let mut cancelled_reservations = 0u32;
    for reservation in reservation_repo
        .find_by_session(session_id, true)
        .await?
    {
        if let Some(rid) = &reservation.id {
            reservation_repo.cancel(&rid.to_string()).await?;
            cancelled_reservations += 1;
        }
    }

    state
        .audit
        .log(
            AuditAction::SessionCancelled,
            "class_session",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "activity": session.activity,
                "date": session.date,
                "reason": req.reason,
                "cancelled_reservations": cancelled_reservations,
            }),
        )
        .await;

    Ok(Json(session))
}

/// POST /api/sessions/{id}/complete - 课次结课
pub async fn complete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ClassSession>> {
    let repo = ClassSessionRepository::new(state.db.clone());
    let session = repo.complete(&id).await?;

    state
        .audit
        .log(
            AuditAction::SessionCompleted,
            "class_session",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "activity": session.activity,
                "date": session.date,
            }),
        )
        .await;

    Ok(Json(session))
}

fn parse_optional_id(value: Option<String>, field: &str) -> AppResult<Option<RecordId>> {
    match value {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid {} ID: {}", field, raw))),
        None => Ok(None),
    }
}
