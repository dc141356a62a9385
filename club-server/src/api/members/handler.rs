//! Member API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::audit::{AuditAction, create_diff, create_snapshot};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Member, MemberCreate, MemberStatus, MemberUpdate};
use crate::db::repository::MemberRepository;
use crate::utils::time::parse_date;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, PaginationParams};

#[derive(Debug, Deserialize)]
pub struct MemberFilterQuery {
    /// 按姓名或卡号模糊匹配
    pub q: Option<String>,
    pub status: Option<MemberStatus>,
}

#[derive(Debug, Serialize)]
pub struct MemberListResponse {
    pub items: Vec<Member>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// GET /api/members?q=&status=&page=&page_size= - 搜索会员（分页）
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<MemberFilterQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<MemberListResponse>> {
    let repo = MemberRepository::new(state.db.clone());
    let (items, total) = repo
        .search(
            filter.q,
            filter.status,
            pagination.limit(),
            pagination.offset(),
        )
        .await?;

    Ok(Json(MemberListResponse {
        items,
        total,
        page: pagination.page,
        page_size: pagination.page_size,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MemberSearchQuery {
    pub q: String,
}

/// GET /api/members/search?q= - 前台快速检索
///
/// 按姓名/卡号/邮箱/电话模糊匹配，最多返回 20 条。
/// 给门禁确认和收银选人用，不分页。
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<MemberSearchQuery>,
) -> AppResult<Json<Vec<Member>>> {
    let q = query.q.trim().to_string();
    if q.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let repo = MemberRepository::new(state.db.clone());
    let (items, _total) = repo.search(Some(q), None, 20, 0).await?;
    Ok(Json(items))
}

/// GET /api/members/{id} - 获取单个会员
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Member>> {
    let repo = MemberRepository::new(state.db.clone());
    let member = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {}", id)))?;

    Ok(Json(member))
}

/// POST /api/members - 创建会员
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<MemberCreate>,
) -> AppResult<Json<Member>> {
    validate_member_fields(
        Some(&payload.first_name),
        Some(&payload.last_name),
        &payload.card_code,
        &payload.email,
        &payload.phone,
        &payload.birth_date,
        &payload.photo_url,
        &payload.note,
    )?;

    let repo = MemberRepository::new(state.db.clone());
    let member = repo.create(payload).await?;

    let id = member
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    state
        .audit
        .log(
            AuditAction::MemberCreated,
            "member",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            create_snapshot(&member, "member"),
        )
        .await;

    Ok(Json(member))
}

/// PUT /api/members/{id} - 更新会员
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<MemberUpdate>,
) -> AppResult<Json<Member>> {
    validate_member_fields(
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
        &payload.card_code,
        &payload.email,
        &payload.phone,
        &payload.birth_date,
        &payload.photo_url,
        &payload.note,
    )?;

    let repo = MemberRepository::new(state.db.clone());

    // 查询旧值（用于审计 diff）
    let old = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {}", id)))?;

    let member = repo.update(&id, payload).await?;

    state
        .audit
        .log(
            AuditAction::MemberUpdated,
            "member",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            create_diff(&old, &member, "member"),
        )
        .await;

    Ok(Json(member))
}

/// POST /api/members/{id}/deactivate - 停用会员
///
/// 会员档案保留，门禁和预约从此拒绝。
pub async fn deactivate(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Member>> {
    let repo = MemberRepository::new(state.db.clone());
    let member = repo.deactivate(&id).await?;

    state
        .audit
        .log(
            AuditAction::MemberDeactivated,
            "member",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "card_code": member.card_code,
                "name": format!("{} {}", member.first_name, member.last_name),
            }),
        )
        .await;

    Ok(Json(member))
}

#[allow(clippy::too_many_arguments)]
fn validate_member_fields(
    first_name: Option<&str>,
    last_name: Option<&str>,
    card_code: &Option<String>,
    email: &Option<String>,
    phone: &Option<String>,
    birth_date: &Option<String>,
    photo_url: &Option<String>,
    note: &Option<String>,
) -> AppResult<()> {
    if let Some(first_name) = first_name {
        validate_required_text(first_name, "first_name", MAX_NAME_LEN)?;
    }
    if let Some(last_name) = last_name {
        validate_required_text(last_name, "last_name", MAX_NAME_LEN)?;
    }
    validate_optional_text(card_code, "card_code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(photo_url, "photo_url", MAX_URL_LEN)?;
    validate_optional_text(note, "note", MAX_NOTE_LEN)?;
    if let Some(date) = birth_date {
        parse_date(date)?;
    }
    Ok(())
}
