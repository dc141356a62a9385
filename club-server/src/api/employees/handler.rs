//! Employee API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::audit::{AuditAction, create_delete_details, create_diff, create_snapshot};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate};
use crate::db::repository::EmployeeRepository;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// List all active employees (excluding system users)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Employee>>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employees = repo.find_all().await?;
    Ok(Json(employees))
}

/// List all employees including inactive (excluding system users)
pub async fn list_with_inactive(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Employee>>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employees = repo.find_all_with_inactive().await?;
    Ok(Json(employees))
}

/// Get employee by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Employee>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {}", id)))?;
    Ok(Json(employee))
}

/// Create a new employee
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    validate_employee_fields(
        Some(&payload.username),
        Some(&payload.password),
        &payload.display_name,
        &payload.specialization,
        &payload.shift,
        &payload.phone,
        &payload.email,
    )?;

    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.create(payload).await?;

    let id = employee
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    state
        .audit
        .log(
            AuditAction::EmployeeCreated,
            "employee",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            create_snapshot(&employee, "employee"),
        )
        .await;

    Ok(Json(employee))
}

/// Update an employee
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    validate_employee_fields(
        payload.username.as_deref(),
        payload.password.as_deref(),
        &payload.display_name,
        &payload.specialization,
        &payload.shift,
        &payload.phone,
        &payload.email,
    )?;

    let repo = EmployeeRepository::new(state.db.clone());

    // 查询旧值（用于审计 diff）
    let old = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {}", id)))?;

    let employee = repo.update(&id, payload).await?;

    state
        .audit
        .log(
            AuditAction::EmployeeUpdated,
            "employee",
            &id,
            Some(current_user.id.clone()),
            Some(current_user.display_name.clone()),
            create_diff(&old, &employee, "employee"),
        )
        .await;

    Ok(Json(employee))
}

/// Soft delete an employee
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = EmployeeRepository::new(state.db.clone());

    let name_for_audit = repo
        .find_by_id(&id)
        .await
        .ok()
        .flatten()
        .map(|e| e.display_name.clone())
        .unwrap_or_default();

    let result = repo.delete(&id).await?;

    if result {
        state
            .audit
            .log(
                AuditAction::EmployeeDeleted,
                "employee",
                &id,
                Some(current_user.id.clone()),
                Some(current_user.display_name.clone()),
                create_delete_details(&name_for_audit),
            )
            .await;
    }

    Ok(Json(result))
}

fn validate_employee_fields(
    username: Option<&str>,
    password: Option<&str>,
    display_name: &Option<String>,
    specialization: &Option<String>,
    shift: &Option<String>,
    phone: &Option<String>,
    email: &Option<String>,
) -> AppResult<()> {
    if let Some(username) = username {
        validate_required_text(username, "username", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(password) = password {
        validate_required_text(password, "password", MAX_PASSWORD_LEN)?;
    }
    validate_optional_text(display_name, "display_name", MAX_NAME_LEN)?;
    validate_optional_text(specialization, "specialization", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(shift, "shift", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    Ok(())
}
