//! Authentication Handlers
//!
//! Handles login, logout, and current user lookup

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::audit::AuditAction;
use crate::auth::{CurrentUser, permissions::role_dashboard};
use crate::core::ServerState;
use crate::db::repository::{EmployeeRepository, RoleRepository};
use crate::utils::AppError;

// Re-use shared DTOs for API consistency
use shared::client::{CurrentUserResponse, LoginRequest, LoginResponse, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login handler
///
/// Authenticates employee credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = req.username.clone();

    let employees = EmployeeRepository::new(state.db.clone());
    let employee = employees.find_by_username(&username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Check authentication result - unified error message to prevent username enumeration
    let employee = match employee {
        Some(e) => {
            // User found - check active status
            if !e.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            // Verify password
            let password_valid = e
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                state
                    .audit
                    .log(
                        AuditAction::LoginFailed,
                        "auth",
                        format!("employee:{}", username),
                        None,
                        None,
                        serde_json::json!({"reason": "invalid_credentials"}),
                    )
                    .await;
                tracing::warn!(username = %username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            e
        }
        None => {
            state
                .audit
                .log(
                    AuditAction::LoginFailed,
                    "auth",
                    format!("employee:{}", username),
                    None,
                    None,
                    serde_json::json!({"reason": "user_not_found"}),
                )
                .await;
            tracing::warn!(username = %username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    // Fetch role information
    let roles = RoleRepository::new(state.db.clone());
    let role = roles
        .find_by_id(&employee.role.to_string())
        .await?
        .ok_or_else(|| AppError::internal("Role not found".to_string()))?;

    if !role.is_active {
        return Err(AppError::forbidden("Role has been disabled".to_string()));
    }

    // Generate JWT token
    let jwt_service = state.get_jwt_service();
    let user_id = employee
        .id
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();

    let token = jwt_service
        .generate_token(
            &user_id,
            &employee.username,
            &employee.display_name,
            &role.name,
            &role.permissions,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    // Log successful login
    state
        .audit
        .log(
            AuditAction::LoginSuccess,
            "auth",
            user_id.clone(),
            Some(user_id.clone()),
            Some(employee.display_name.clone()),
            serde_json::json!({"username": &employee.username}),
        )
        .await;

    tracing::info!(
        user_id = %user_id,
        username = %employee.username,
        role = %role.name,
        "User logged in successfully"
    );

    let response = LoginResponse {
        token,
        dashboard: role_dashboard(&role.name).to_string(),
        user: UserInfo {
            id: user_id,
            username: employee.username.clone(),
            display_name: employee.display_name.clone(),
            role: role.name,
            permissions: role.permissions,
        },
    };

    Ok(Json(response))
}

/// Get current user info
pub async fn me(
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<CurrentUserResponse>, AppError> {
    let dashboard = role_dashboard(&user.role).to_string();
    Ok(Json(CurrentUserResponse {
        id: user.id,
        username: user.username,
        role: user.role,
        permissions: user.permissions,
        dashboard,
    }))
}

/// Logout handler
pub async fn logout(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<()>, AppError> {
    state
        .audit
        .log(
            AuditAction::Logout,
            "auth",
            user.id.clone(),
            Some(user.id.clone()),
            Some(user.display_name.clone()),
            serde_json::json!({"username": &user.username}),
        )
        .await;

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        "User logged out"
    );

    Ok(Json(()))
}
