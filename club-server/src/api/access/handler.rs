//! 门禁 API Handlers
//!
//! 刷卡判定流程：
//! 1. 卡号 → 会员 (查不到 → unknown_card)
//! 2. 会员状态 (INACTIVE → member_inactive)
//! 3. 当天有效订阅 (无 → no_active_subscription)
//!
//! 每次刷卡都落一条 access_event，拒绝也记录。

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{AccessDenyReason, AccessEvent, Member, MemberStatus};
use crate::db::repository::{
    AccessEventRepository, MemberRepository, SubscriptionRepository,
    access::AccessEventInsert,
};
use crate::utils::{AppError, AppResult, time};

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub card_code: String,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub granted: bool,
    pub deny_reason: Option<AccessDenyReason>,
    /// 门禁屏展示数据
    pub member_name: Option<String>,
    pub photo_url: Option<String>,
    pub event: AccessEvent,
}

/// POST /api/access/check-in - 刷卡判定
pub async fn check_in(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<CheckInRequest>,
) -> AppResult<Json<CheckInResponse>> {
    let members = MemberRepository::new(state.db.clone());
    let subscriptions = SubscriptionRepository::new(state.db.clone());
    let events = AccessEventRepository::new(state.db.clone());

    let today = time::today_local(state.config.timezone)
        .format("%Y-%m-%d")
        .to_string();

    let member = members.find_by_card_code(&req.card_code).await?;

    // 判定阶梯，第一条命中的拒绝原因生效
    let (member, deny_reason, subscription) = match member {
        None => (None, Some(AccessDenyReason::UnknownCard), None),
        Some(m) if m.status != MemberStatus::Active => {
            (Some(m), Some(AccessDenyReason::MemberInactive), None)
        }
        Some(m) => {
            let member_id = m
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Member missing ID"))?;
            match subscriptions.find_active_covering(member_id, &today).await? {
                Some(sub) => (Some(m), None, sub.id),
                None => (Some(m), Some(AccessDenyReason::NoActiveSubscription), None),
            }
        }
    };

    let granted = deny_reason.is_none();
    let member_name = member.as_ref().map(Member::full_name);
    let photo_url = member.as_ref().and_then(|m| m.photo_url.clone());

    let event = events
        .record(AccessEventInsert {
            card_code: req.card_code.clone(),
            member: member.as_ref().and_then(|m| m.id.clone()),
            member_name: member_name.clone(),
            photo_url: photo_url.clone(),
            granted,
            deny_reason,
            subscription,
        })
        .await?;

    let event_id = event.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    let action = if granted {
        AuditAction::AccessGranted
    } else {
        AuditAction::AccessDenied
    };

    state
        .audit
        .log(
            action,
            "access_event",
            &event_id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "card_code": req.card_code,
                "member_name": member_name,
                "deny_reason": deny_reason.map(|r| r.to_string()),
            }),
        )
        .await;

    if granted {
        tracing::info!(card_code = %req.card_code, "Access granted");
    } else {
        tracing::info!(
            card_code = %req.card_code,
            reason = %deny_reason.map(|r| r.to_string()).unwrap_or_default(),
            "Access denied"
        );
    }

    Ok(Json(CheckInResponse {
        granted,
        deny_reason,
        member_name,
        photo_url,
        event,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

/// GET /api/access/recent?limit= - 最近刷卡记录 (门禁屏轮询)
pub async fn recent(
    State(state): State<ServerState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<AccessEvent>>> {
    let repo = AccessEventRepository::new(state.db.clone());
    let events = repo.find_recent(query.limit.unwrap_or(20)).await?;
    Ok(Json(events))
}

/// GET /api/access/member/{id}?limit= - 单个会员的刷卡历史
pub async fn member_history(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<AccessEvent>>> {
    let member: RecordId = id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid member ID: {}", id)))?;

    let repo = AccessEventRepository::new(state.db.clone());
    let events = repo.find_by_member(member, query.limit.unwrap_or(50)).await?;
    Ok(Json(events))
}

#[derive(Debug, Serialize)]
pub struct TodaySummary {
    pub date: String,
    pub granted: u64,
    pub denied: u64,
    pub unique_members: u64,
}

/// GET /api/access/today - 今日门禁汇总
pub async fn today_summary(
    State(state): State<ServerState>,
) -> AppResult<Json<TodaySummary>> {
    let tz = state.config.timezone;
    let today = time::today_local(tz);
    let start = time::day_start_millis(today, tz);
    let end = time::day_end_millis(today, tz);

    let repo = AccessEventRepository::new(state.db.clone());
    let granted = repo.count_in_range(start, end, Some(true)).await?;
    let denied = repo.count_in_range(start, end, Some(false)).await?;
    let unique_members = repo.count_unique_members_in_range(start, end).await?;

    Ok(Json(TodaySummary {
        date: today.format("%Y-%m-%d").to_string(),
        granted,
        denied,
        unique_members,
    }))
}
