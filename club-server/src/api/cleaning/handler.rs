//! Cleaning API Handlers
//!
//! 任务定义可复用；排班是"某天 + 某任务 + 某员工"的一次指派，
//! 同一组合同一天只能指派一次。

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
    CleaningAssignment, CleaningAssignmentCreate, CleaningTask, CleaningTaskCreate,
    CleaningTaskUpdate,
};
use crate::db::repository::{
    CleaningAssignmentRepository, CleaningTaskRepository, EmployeeRepository,
};
use crate::utils::time::parse_date;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

// ── 任务定义 ────────────────────────────────────────────────────────

/// GET /api/cleaning/tasks - 列出任务定义
pub async fn list_tasks(State(state): State<ServerState>) -> AppResult<Json<Vec<CleaningTask>>> {
    let repo = CleaningTaskRepository::new(state.db.clone());
    let tasks = repo.find_all().await?;
    Ok(Json(tasks))
}

/// GET /api/cleaning/tasks/{id} - 获取单个任务定义
pub async fn get_task(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CleaningTask>> {
    let repo = CleaningTaskRepository::new(state.db.clone());
    let task = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cleaning task {}", id)))?;
    Ok(Json(task))
}

/// POST /api/cleaning/tasks - 创建任务定义
pub async fn create_task(
    State(state): State<ServerState>,
    Json(payload): Json<CleaningTaskCreate>,
) -> AppResult<Json<CleaningTask>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.frequency, "frequency", MAX_SHORT_TEXT_LEN)?;

    let repo = CleaningTaskRepository::new(state.db.clone());
    let task = repo.create(payload).await?;
    Ok(Json(task))
}

/// PUT /api/cleaning/tasks/{id} - 更新任务定义
pub async fn update_task(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CleaningTaskUpdate>,
) -> AppResult<Json<CleaningTask>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.frequency, "frequency", MAX_SHORT_TEXT_LEN)?;

    let repo = CleaningTaskRepository::new(state.db.clone());
    let task = repo.update(&id, payload).await?;
    Ok(Json(task))
}

/// DELETE /api/cleaning/tasks/{id} - 删除任务定义
///
/// 有排班引用（含历史）时拒绝，改用停用。
pub async fn delete_task(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CleaningTaskRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}

// ── 排班 ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssignmentFilterQuery {
    /// 执行日期 (YYYY-MM-DD)
    pub date: String,
    pub employee: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct MarkDoneRequest {
    pub note: Option<String>,
}

/// GET /api/cleaning/assignments?date=&employee= - 某天的排班
pub async fn list_assignments(
    State(state): State<ServerState>,
    Query(filter): Query<AssignmentFilterQuery>,
) -> AppResult<Json<Vec<CleaningAssignment>>> {
    parse_date(&filter.date)?;
    let employee = match filter.employee {
        Some(raw) => Some(
            raw.parse::<RecordId>()
                .map_err(|_| AppError::validation(format!("Invalid employee ID: {}", raw)))?,
        ),
        None => None,
    };

    let repo = CleaningAssignmentRepository::new(state.db.clone());
    let assignments = repo.find_by_date(&filter.date, employee).await?;
    Ok(Json(assignments))
}

/// POST /api/cleaning/assignments - 指派任务
///
/// 员工必须在职；同一 (任务, 员工, 日期) 不能重复指派。
pub async fn create_assignment(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CleaningAssignmentCreate>,
) -> AppResult<Json<CleaningAssignment>> {
    parse_date(&payload.date)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let task_repo = CleaningTaskRepository::new(state.db.clone());
    let task = task_repo
        .find_by_id(&payload.task.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cleaning task {}", payload.task)))?;
    if !task.is_active {
        return Err(AppError::business_rule(
            "Inactive cleaning tasks cannot be assigned",
        ));
    }

    let employee_repo = EmployeeRepository::new(state.db.clone());
    let employee = employee_repo
        .find_by_id(&payload.employee.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {}", payload.employee)))?;
    if !employee.is_active {
        return Err(AppError::with_message(
            ErrorCode::EmployeeInactive,
            "Inactive employees cannot be assigned cleaning work",
        ));
    }

    let repo = CleaningAssignmentRepository::new(state.db.clone());
    if repo
        .find_duplicate(payload.task.clone(), payload.employee.clone(), &payload.date)
        .await?
        .is_some()
    {
        return Err(AppError::already_exists(
            "Assignment for this task, employee and date",
        ));
    }

    let assignment = repo
        .create(
            payload.task,
            task.name.clone(),
            payload.employee,
            employee.display_name.clone(),
            payload.date,
            payload.note,
        )
        .await?;

    let id = assignment
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();
    state
        .audit
        .log(
            AuditAction::CleaningAssigned,
            "cleaning_assignment",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "task_name": assignment.task_name,
                "employee_name": assignment.employee_name,
                "date": assignment.date,
            }),
        )
        .await;

    Ok(Json(assignment))
}

/// POST /api/cleaning/assignments/{id}/done - 完成打卡
///
/// 清洁员只能给自己的指派打卡；带 cleaning:manage 权限的可以代打。
pub async fn mark_done(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<MarkDoneRequest>,
) -> AppResult<Json<CleaningAssignment>> {
    validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;

    let repo = CleaningAssignmentRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cleaning assignment {}", id)))?;
    if !current_user.has_permission("cleaning:manage")
        && existing.employee.to_string() != current_user.id
    {
        return Err(AppError::forbidden(
            "Only the assigned employee can complete this assignment",
        ));
    }

    let assignment = repo.mark_done(&id, req.note).await?;

    state
        .audit
        .log(
            AuditAction::CleaningCompleted,
            "cleaning_assignment",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            serde_json::json!({
                "task_name": assignment.task_name,
                "employee_name": assignment.employee_name,
                "date": assignment.date,
            }),
        )
        .await;

    Ok(Json(assignment))
}

/// DELETE /api/cleaning/assignments/{id} - 撤销未完成的指派
pub async fn delete_assignment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CleaningAssignmentRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
