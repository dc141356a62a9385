//! Dashboard API Handlers
//!
//! 看板数据全部实时聚合，不做缓存：门店规模下这些计数查询足够快。

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::MemberStatus;
use crate::db::repository::reservation::ActivityCount;
use crate::db::repository::sale::MethodRevenue;
use crate::db::repository::{
    AccessEventRepository, ClassSessionRepository, CleaningAssignmentRepository,
    MaintenanceRepository, MemberRepository, ReservationRepository, SaleRepository,
    SubscriptionRepository,
};
use crate::utils::AppResult;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, today_local};

// ============================================================================
// Response Types
// ============================================================================

/// 看板首屏汇总
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub members_total: u64,
    pub members_active: u64,
    pub subscriptions_active: u64,
    /// 7 天内到期的有效会籍
    pub subscriptions_expiring_soon: u64,
    pub accesses_today: u64,
    pub denied_today: u64,
    pub revenue_today: f64,
    pub sessions_today: u64,
    pub open_maintenance: u64,
    pub pending_cleaning: u64,
}

/// Access trend data point
#[derive(Debug, Clone, Serialize)]
pub struct AccessTrendPoint {
    pub date: String,
    pub granted: u64,
    pub denied: u64,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TopActivitiesQuery {
    pub days: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct BreakdownQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/dashboard - 看板汇总
pub async fn get_summary(State(state): State<ServerState>) -> AppResult<Json<DashboardSummary>> {
    let tz = state.config.timezone;
    let today = today_local(tz);
    let start = day_start_millis(today, tz);
    let end = day_end_millis(today, tz);
    let today_str = today.format("%Y-%m-%d").to_string();
    let cutoff = (today + Duration::days(7)).format("%Y-%m-%d").to_string();

    let members = MemberRepository::new(state.db.clone());
    let subscriptions = SubscriptionRepository::new(state.db.clone());
    let access = AccessEventRepository::new(state.db.clone());
    let sales = SaleRepository::new(state.db.clone());
    let sessions = ClassSessionRepository::new(state.db.clone());
    let maintenance = MaintenanceRepository::new(state.db.clone());
    let cleaning = CleaningAssignmentRepository::new(state.db.clone());

    let summary = DashboardSummary {
        members_total: members.count_all().await?,
        members_active: members.count_by_status(MemberStatus::Active).await?,
        subscriptions_active: subscriptions.count_active().await?,
        subscriptions_expiring_soon: subscriptions.count_expiring_by(&today_str, &cutoff).await?,
        accesses_today: access.count_in_range(start, end, Some(true)).await?,
        denied_today: access.count_in_range(start, end, Some(false)).await?,
        revenue_today: sales.sum_in_range(start, end).await?,
        sessions_today: sessions.count_on_date(&today_str).await?,
        open_maintenance: maintenance.count_open().await?,
        pending_cleaning: cleaning.count_pending_on(&today_str).await?,
    };

    Ok(Json(summary))
}

/// GET /api/dashboard/access-trend?days=N - 最近 N 天进出趋势 (默认 7 天)
pub async fn get_access_trend(
    State(state): State<ServerState>,
    Query(query): Query<TrendQuery>,
) -> AppResult<Json<Vec<AccessTrendPoint>>> {
    let tz = state.config.timezone;
    let days = query.days.unwrap_or(7).clamp(1, 90) as i64;
    let today = today_local(tz);
    let repo = AccessEventRepository::new(state.db.clone());

    let mut points = Vec::with_capacity(days as usize);
    for offset in (0..days).rev() {
        let date = today - Duration::days(offset);
        let start = day_start_millis(date, tz);
        let end = day_end_millis(date, tz);
        points.push(AccessTrendPoint {
            date: date.format("%Y-%m-%d").to_string(),
            granted: repo.count_in_range(start, end, Some(true)).await?,
            denied: repo.count_in_range(start, end, Some(false)).await?,
        });
    }

    Ok(Json(points))
}

/// GET /api/dashboard/top-activities?days=N&limit=M - 预约量最高的活动 (默认 30 天 / 前 10)
pub async fn get_top_activities(
    State(state): State<ServerState>,
    Query(query): Query<TopActivitiesQuery>,
) -> AppResult<Json<Vec<ActivityCount>>> {
    let tz = state.config.timezone;
    let days = query.days.unwrap_or(30).clamp(1, 365) as i64;
    let today = today_local(tz);
    let start = day_start_millis(today - Duration::days(days - 1), tz);
    let end = day_end_millis(today, tz);

    let repo = ReservationRepository::new(state.db.clone());
    let rows = repo
        .top_activities(start, end, query.limit.unwrap_or(10))
        .await?;
    Ok(Json(rows))
}

/// GET /api/dashboard/sales-breakdown?from=&to= - 按支付方式的营收构成 (默认最近 30 天)
pub async fn get_sales_breakdown(
    State(state): State<ServerState>,
    Query(query): Query<BreakdownQuery>,
) -> AppResult<Json<Vec<MethodRevenue>>> {
    let tz = state.config.timezone;
    let today = today_local(tz);
    let from = match query.from.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today - Duration::days(30),
    };
    let to = match query.to.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today,
    };

    let repo = SaleRepository::new(state.db.clone());
    let rows = repo
        .breakdown_by_method(day_start_millis(from, tz), day_end_millis(to, tz))
        .await?;
    Ok(Json(rows))
}
