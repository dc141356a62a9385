//! Subscription API Handlers
//!
//! 同一会员的激活订阅区间不允许重叠。续费总是开新记录，
//! 历史周期完整保留。

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use chrono::Duration;
use serde::Deserialize;
use shared::ErrorCode;
use surrealdb::RecordId;

use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Subscription, SubscriptionCreate, SubscriptionRenew};
use crate::db::repository::{MemberRepository, SubscriptionRepository};
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SubscriptionFilterQuery {
    pub member: String,
}

/// GET /api/subscriptions?member= - 会员的订阅历史（新在前）
pub async fn list_by_member(
    State(state): State<ServerState>,
    Query(filter): Query<SubscriptionFilterQuery>,
) -> AppResult<Json<Vec<Subscription>>> {
    let member: RecordId = filter
        .member
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid member ID: {}", filter.member)))?;
    let repo = SubscriptionRepository::new(state.db.clone());
    let subscriptions = repo.find_by_member(member).await?;
    Ok(Json(subscriptions))
}

/// GET /api/subscriptions/{id} - 获取单个订阅
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Subscription>> {
    let repo = SubscriptionRepository::new(state.db.clone());
    let subscription = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subscription {}", id)))?;
    Ok(Json(subscription))
}

/// POST /api/subscriptions - 开通订阅
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<SubscriptionCreate>,
) -> AppResult<Json<Subscription>> {
    let start = parse_date(&payload.start_date)?;
    let end = parse_date(&payload.end_date)?;
    if start > end {
        return Err(AppError::with_message(
            ErrorCode::SubscriptionDateInvalid,
            "start_date must not be after end_date",
        ));
    }
    if payload.price.is_sign_negative() {
        return Err(AppError::validation("price must not be negative"));
    }
    if payload.plan.trim().is_empty() {
        return Err(AppError::validation("plan must not be empty"));
    }

    let member_repo = MemberRepository::new(state.db.clone());
    let member = member_repo
        .find_by_id(&payload.member.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {}", payload.member)))?;

    let repo = SubscriptionRepository::new(state.db.clone());
    if let Some(existing) = repo
        .find_overlapping_active(
            payload.member.clone(),
            &payload.start_date,
            &payload.end_date,
        )
        .await?
    {
        return Err(AppError::with_message(
            ErrorCode::SubscriptionOverlaps,
            format!(
                "Member already has an active subscription {} .. {}",
                existing.start_date, existing.end_date
            ),
        ));
    }

    let subscription = repo
        .create(
            payload.member,
            member.full_name(),
            payload.plan,
            payload.price,
            payload.start_date,
            payload.end_date,
        )
        .await?;

    audit_subscription(
        &state,
        &current_user,
        AuditAction::SubscriptionCreated,
        &subscription,
    )
    .await;

    Ok(Json(subscription))
}

/// POST /api/subscriptions/{id}/renew - 续费
///
/// 新周期默认：上一周期结束次日生效，天数、套餐、价格沿用上一周期，
/// 均可在请求中覆盖。
pub async fn renew(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<SubscriptionRenew>,
) -> AppResult<Json<Subscription>> {
    let repo = SubscriptionRepository::new(state.db.clone());
    let previous = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Subscription {}", id)))?;

    let prev_start = parse_date(&previous.start_date)?;
    let prev_end = parse_date(&previous.end_date)?;
    let days = match req.days {
        Some(0) => return Err(AppError::validation("days must be at least 1")),
        Some(days) => i64::from(days),
        None => (prev_end - prev_start).num_days() + 1,
    };

    let new_start = prev_end + Duration::days(1);
    let new_end = new_start + Duration::days(days - 1);
    let start_date = new_start.format("%Y-%m-%d").to_string();
    let end_date = new_end.format("%Y-%m-%d").to_string();

    if let Some(price) = req.price
        && price.is_sign_negative()
    {
        return Err(AppError::validation("price must not be negative"));
    }

    if let Some(existing) = repo
        .find_overlapping_active(previous.member.clone(), &start_date, &end_date)
        .await?
    {
        return Err(AppError::with_message(
            ErrorCode::SubscriptionOverlaps,
            format!(
                "Member already has an active subscription {} .. {}",
                existing.start_date, existing.end_date
            ),
        ));
    }

    let subscription = repo
        .create(
            previous.member.clone(),
            previous.member_name.clone(),
            req.plan.unwrap_or_else(|| previous.plan.clone()),
            req.price.unwrap_or(previous.price),
            start_date,
            end_date,
        )
        .await?;

    audit_subscription(
        &state,
        &current_user,
        AuditAction::SubscriptionRenewed,
        &subscription,
    )
    .await;

    Ok(Json(subscription))
}

/// POST /api/subscriptions/{id}/cancel - 取消订阅
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Subscription>> {
    let repo = SubscriptionRepository::new(state.db.clone());
    let subscription = repo.cancel(&id).await?;

    audit_subscription(
        &state,
        &current_user,
        AuditAction::SubscriptionCancelled,
        &subscription,
    )
    .await;

    Ok(Json(subscription))
}

async fn audit_subscription(
    state: &ServerState,
    current_user: &CurrentUser,
    action: AuditAction,
    subscription: &Subscription,
) {
    let id = subscription
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    state
        .audit
        .log(
            action,
            "subscription",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "member_name": subscription.member_name,
                "plan": subscription.plan,
                "price": subscription.price,
                "start_date": subscription.start_date,
                "end_date": subscription.end_date,
            }),
        )
        .await;
}
