//! Role API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Role router
pub fn router() -> Router<ServerState> {
    // 读取路由：无需权限检查（员工表单需要角色列表）
    let read_routes = Router::new()
        .nest("/api/roles", roles_read_routes())
        .route("/api/permissions", get(handler::get_all_permissions));

    // 管理路由：仅管理员可用
    let manage_routes = Router::new()
        .nest("/api/roles", roles_manage_routes())
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}

fn roles_read_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/permissions", get(handler::get_role_permissions))
}

fn roles_manage_routes() -> Router<ServerState> {
    Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route(
            "/{id}/permissions",
            axum::routing::put(handler::update_role_permissions),
        )
}
