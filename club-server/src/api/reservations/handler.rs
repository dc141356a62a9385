//! Reservation API Handlers
//!
//! 预约规则：课次必须是 SCHEDULED 且未过期；同一会员同一课次
//! 只能有一个占用名额的预约；容量满则拒绝。

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
use crate::db::models::{Reservation, ReservationCreate, SessionStatus};
use crate::db::repository::{ClassSessionRepository, MemberRepository, ReservationRepository};
use crate::utils::time::{parse_date, today_local};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ReservationFilterQuery {
    pub session: Option<String>,
    pub member: Option<String>,
    /// true 时只返回占用名额的预约
    #[serde(default)]
    pub active: bool,
}

/// GET /api/reservations?session=|member= - 按课次或会员列出预约
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<ReservationFilterQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let repo = ReservationRepository::new(state.db.clone());
    match (filter.session, filter.member) {
        (Some(session), _) => {
            let thing: RecordId = session
                .parse()
                .map_err(|_| AppError::validation(format!("Invalid session ID: {}", session)))?;
            Ok(Json(repo.find_by_session(thing, filter.active).await?))
        }
        (None, Some(member)) => {
            let thing: RecordId = member
                .parse()
                .map_err(|_| AppError::validation(format!("Invalid member ID: {}", member)))?;
            Ok(Json(repo.find_by_member(thing).await?))
        }
        (None, None) => Err(AppError::validation(
            "Either session or member query parameter is required",
        )),
    }
}

/// POST /api/reservations - 创建预约
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    let session_repo = ClassSessionRepository::new(state.db.clone());
    let session = session_repo
        .find_by_id(&payload.session.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Session {}", payload.session)))?;

    if session.status != SessionStatus::Scheduled {
        return Err(AppError::with_message(
            ErrorCode::SessionNotReservable,
            format!(
                "Session is {:?}, only scheduled sessions accept reservations",
                session.status
            ),
        ));
    }
    let session_date = parse_date(&session.date)?;
    if session_date < today_local(state.config.timezone) {
        return Err(AppError::with_message(
            ErrorCode::SessionNotReservable,
            "Past sessions cannot be reserved",
        ));
    }

    let member_repo = MemberRepository::new(state.db.clone());
    let member = member_repo
        .find_by_id(&payload.member.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {}", payload.member)))?;
    if !member.is_active() {
        return Err(AppError::with_message(
            ErrorCode::MemberInactive,
            "Inactive members cannot make reservations",
        ));
    }

    let repo = ReservationRepository::new(state.db.clone());
    if repo
        .find_active_for(payload.session.clone(), payload.member.clone())
        .await?
        .is_some()
    {
        return Err(AppError::with_message(
            ErrorCode::AlreadyReserved,
            "Member already has an active reservation for this session",
        ));
    }

    let active = repo.count_active_by_session(payload.session.clone()).await?;
    if active >= session.capacity as u64 {
        return Err(AppError::with_message(
            ErrorCode::SessionFull,
            format!("Session is full ({} / {})", active, session.capacity),
        ));
    }

    let reservation = repo
        .create(payload.session, payload.member, member.full_name())
        .await?;

    let id = reservation
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    state
        .audit
        .log(
            AuditAction::ReservationCreated,
            "reservation",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "member_name": reservation.member_name,
                "activity": session.activity,
                "date": session.date,
            }),
        )
        .await;

    Ok(Json(reservation))
}

/// POST /api/reservations/{id}/cancel - 取消预约，释放名额
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservation = repo.cancel(&id).await?;

    state
        .audit
        .log(
            AuditAction::ReservationCancelled,
            "reservation",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({ "member_name": reservation.member_name }),
        )
        .await;

    Ok(Json(reservation))
}

/// POST /api/reservations/{id}/check-in - 到场签到
pub async fn check_in(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservation = repo.check_in(&id).await?;

    state
        .audit
        .log(
            AuditAction::ReservationCheckedIn,
            "reservation",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({ "member_name": reservation.member_name }),
        )
        .await;

    Ok(Json(reservation))
}
