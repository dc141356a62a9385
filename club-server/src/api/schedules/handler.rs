//! Schedule API Handlers
//!
//! 模板 CRUD + 课次生成。生成端点接收 `{from, to}` 日期区间，
//! 返回 `{examined, created, skipped_existing}` 统计。

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    EmployeeId, ScheduleTemplate, ScheduleTemplateCreate, ScheduleTemplateUpdate, chrono_weekday,
};
use crate::db::repository::{EmployeeRepository, ScheduleTemplateRepository, SpaceRepository};
use crate::scheduling::{GenerationReport, GenerationService};
use crate::utils::time::{parse_date, parse_time};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct TemplateFilterQuery {
    /// true 时只返回激活模板
    #[serde(default)]
    pub active: bool,
}

/// 生成请求：闭区间 [from, to]，YYYY-MM-DD
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub from: String,
    pub to: String,
}

/// GET /api/schedules?active= - 列出课程模板
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<TemplateFilterQuery>,
) -> AppResult<Json<Vec<ScheduleTemplate>>> {
    let repo = ScheduleTemplateRepository::new(state.db.clone());
    let templates = if filter.active {
        repo.find_active().await?
    } else {
        repo.find_all().await?
    };
    Ok(Json(templates))
}

/// GET /api/schedules/{id} - 获取单个模板
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ScheduleTemplate>> {
    let repo = ScheduleTemplateRepository::new(state.db.clone());
    let template = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Schedule template {}", id)))?;
    Ok(Json(template))
}

/// POST /api/schedules - 创建课程模板
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ScheduleTemplateCreate>,
) -> AppResult<Json<ScheduleTemplate>> {
    validate_required_text(&payload.activity, "activity", MAX_NAME_LEN)?;
    validate_template_times(
        payload.weekday,
        &payload.start_time,
        &payload.end_time,
        &payload.valid_from,
        &payload.valid_until,
    )?;
    if payload.capacity == Some(0) {
        return Err(AppError::validation("capacity must be at least 1"));
    }

    if SpaceRepository::new(state.db.clone())
        .find_by_id(&payload.space.to_string())
        .await?
        .is_none()
    {
        return Err(AppError::not_found(format!("Space {}", payload.space)));
    }
    if let Some(coach) = &payload.coach {
        require_active_coach(&state, coach).await?;
    }

    let repo = ScheduleTemplateRepository::new(state.db.clone());
    let template = repo.create(payload).await?;
    Ok(Json(template))
}

/// PUT /api/schedules/{id} - 更新课程模板
///
/// 只影响之后的展开，已生成课次保留各自的快照。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ScheduleTemplateUpdate>,
) -> AppResult<Json<ScheduleTemplate>> {
    if let Some(activity) = &payload.activity {
        validate_required_text(activity, "activity", MAX_NAME_LEN)?;
    }
    if let Some(weekday) = payload.weekday
        && chrono_weekday(weekday).is_none()
    {
        return Err(AppError::validation(format!(
            "weekday must be 0-6, got {}",
            weekday
        )));
    }
    if let Some(t) = &payload.start_time {
        parse_time(t)?;
    }
    if let Some(t) = &payload.end_time {
        parse_time(t)?;
    }
    if let Some(d) = &payload.valid_from {
        parse_date(d)?;
    }
    if let Some(d) = &payload.valid_until {
        parse_date(d)?;
    }
    if payload.capacity == Some(0) {
        return Err(AppError::validation("capacity must be at least 1"));
    }
    if let Some(coach) = &payload.coach {
        require_active_coach(&state, coach).await?;
    }

    let repo = ScheduleTemplateRepository::new(state.db.clone());
    let template = repo.update(&id, payload).await?;
    Ok(Json(template))
}

/// DELETE /api/schedules/{id} - 删除课程模板
///
/// 已生成的课次不受影响。
pub async fn delete_template(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ScheduleTemplateRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}

/// POST /api/schedules/{id}/generate - 将单个模板展开为课次
pub async fn generate_for_template(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<GenerateRequest>,
) -> AppResult<Json<GenerationReport>> {
    let service = GenerationService::new(state.db.clone());
    let report = service.generate_for_template(&id, &req.from, &req.to).await?;

    log_generation(&state, &current_user, Some(&id), &req, &report).await;

    Ok(Json(report))
}

/// POST /api/schedules/generate - 展开所有激活模板
pub async fn generate_all(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<GenerateRequest>,
) -> AppResult<Json<GenerationReport>> {
    let service = GenerationService::new(state.db.clone());
    let report = service.generate_all(&req.from, &req.to).await?;

    log_generation(&state, &current_user, None, &req, &report).await;

    Ok(Json(report))
}

async fn require_active_coach(state: &ServerState, coach: &EmployeeId) -> AppResult<()> {
    let employee = EmployeeRepository::new(state.db.clone())
        .find_by_id(&coach.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {}", coach)))?;
    if !employee.is_active {
        return Err(AppError::with_message(
            ErrorCode::EmployeeInactive,
            "Inactive employees cannot be assigned as coach",
        ));
    }
    Ok(())
}

fn validate_template_times(
    weekday: u8,
    start_time: &str,
    end_time: &str,
    valid_from: &str,
    valid_until: &str,
) -> AppResult<()> {
    if chrono_weekday(weekday).is_none() {
        return Err(AppError::validation(format!(
            "weekday must be 0-6, got {}",
            weekday
        )));
    }
    let start = parse_time(start_time)?;
    let end = parse_time(end_time)?;
    if start >= end {
        return Err(AppError::new(ErrorCode::ScheduleTimeInvalid));
    }
    let from = parse_date(valid_from)?;
    let until = parse_date(valid_until)?;
    if from > until {
        return Err(AppError::new(ErrorCode::ScheduleWindowInvalid));
    }
    Ok(())
}

async fn log_generation(
    state: &ServerState,
    current_user: &CurrentUser,
    template_id: Option<&str>,
    req: &GenerateRequest,
    report: &GenerationReport,
) {
    let (resource_id, scope) = match template_id {
        Some(id) => (id.to_string(), serde_json::json!(id)),
        None => ("schedule_template:all".to_string(), serde_json::json!("all")),
    };
    state
        .audit
        .log(
            AuditAction::SessionsGenerated,
            "schedule_template",
            &resource_id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "scope": scope,
                "from": req.from,
                "to": req.to,
                "examined": report.examined,
                "created": report.created,
                "skipped_existing": report.skipped_existing,
            }),
        )
        .await;
}
