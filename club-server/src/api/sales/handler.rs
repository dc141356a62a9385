//! Sales API Handlers
//!
//! 金额全部服务端计算：行小计 = 数量 × 单价，总额 = 行小计之和。
//! 客户端传来的任何金额都不被采信。

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::ErrorCode;
use shared::util::{now_millis, snowflake_id};
use surrealdb::RecordId;

use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Sale, SaleCreate, SaleLine};
use crate::db::repository::sale::SaleInsert;
use crate::db::repository::{MemberRepository, SaleRepository};
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, today_local};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, PaginationParams};

#[derive(Debug, Deserialize)]
pub struct SaleFilterQuery {
    /// 起始日期 (YYYY-MM-DD, 含)；缺省为 30 天前
    pub from: Option<String>,
    /// 结束日期 (YYYY-MM-DD, 含)；缺省为今天
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaleListResponse {
    pub items: Vec<Sale>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// POST /api/sales - 登记一笔销售
pub async fn register(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<SaleCreate>,
) -> AppResult<Json<Sale>> {
    if payload.lines.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::SaleEmpty,
            "A sale needs at least one line",
        ));
    }

    let mut lines = Vec::with_capacity(payload.lines.len());
    let mut total = Decimal::ZERO;
    for line in payload.lines {
        validate_required_text(&line.description, "description", MAX_NAME_LEN)?;
        if line.quantity == 0 {
            return Err(AppError::with_message(
                ErrorCode::SaleInvalidAmount,
                "quantity must be at least 1",
            ));
        }
        if line.unit_price.is_sign_negative() {
            return Err(AppError::with_message(
                ErrorCode::SaleInvalidAmount,
                "unit_price must not be negative",
            ));
        }

        let line_total = line.unit_price * Decimal::from(line.quantity);
        total += line_total;
        lines.push(SaleLine {
            description: line.description,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total,
        });
    }

    // 关联会员可选；给了就必须存在
    let (member, member_name) = match payload.member {
        Some(member_id) => {
            let member_repo = MemberRepository::new(state.db.clone());
            let member = member_repo
                .find_by_id(&member_id.to_string())
                .await?
                .ok_or_else(|| AppError::not_found(format!("Member {}", member_id)))?;
            (Some(member_id), Some(member.full_name()))
        }
        None => (None, None),
    };

    let sold_by: Option<RecordId> = current_user.id.parse().ok();
    let insert = SaleInsert {
        receipt_number: snowflake_id().to_string(),
        lines,
        total,
        payment_method: payload.payment_method,
        member,
        member_name,
        sold_by,
        sold_by_name: Some(current_user.display_name.clone()),
        sold_at: now_millis(),
    };

    let repo = SaleRepository::new(state.db.clone());
    let sale = repo.create(insert).await?;

    let id = sale.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    state
        .audit
        .log(
            AuditAction::SaleRegistered,
            "sale",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "receipt_number": sale.receipt_number,
                "total": sale.total,
                "payment_method": sale.payment_method,
                "lines": sale.lines.len(),
            }),
        )
        .await;

    Ok(Json(sale))
}

/// GET /api/sales?from=&to=&page=&page_size= - 销售历史（分页，新在前）
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<SaleFilterQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<SaleListResponse>> {
    let tz = state.config.timezone;
    let today = today_local(tz);

    let from = match filter.from {
        Some(d) => parse_date(&d)?,
        None => today - Duration::days(30),
    };
    let to = match filter.to {
        Some(d) => parse_date(&d)?,
        None => today,
    };
    if from > to {
        return Err(AppError::validation("Date range start is after end"));
    }

    let repo = SaleRepository::new(state.db.clone());
    let (items, total) = repo
        .find_in_range(
            day_start_millis(from, tz),
            day_end_millis(to, tz),
            pagination.limit(),
            pagination.offset(),
        )
        .await?;

    Ok(Json(SaleListResponse {
        items,
        total,
        page: pagination.page,
        page_size: pagination.page_size,
    }))
}

/// GET /api/sales/{id} - 小票详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Sale>> {
    let repo = SaleRepository::new(state.db.clone());
    let sale = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Sale {}", id)))?;
    Ok(Json(sale))
}
