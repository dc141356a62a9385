//! Cleaning API 模块 (清洁任务与排班)

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cleaning", routes())
}

fn routes() -> Router<ServerState> {
    // 完成打卡对所有登录员工开放，handler 内校验是本人或持 cleaning:manage
    let read_routes = Router::new()
        .route("/tasks", get(handler::list_tasks))
        .route("/tasks/{id}", get(handler::get_task))
        .route("/assignments", get(handler::list_assignments))
        .route("/assignments/{id}/done", post(handler::mark_done));

    let manage_routes = Router::new()
        .route("/tasks", post(handler::create_task))
        .route(
            "/tasks/{id}",
            put(handler::update_task).delete(handler::delete_task),
        )
        .route("/assignments", post(handler::create_assignment))
        .route("/assignments/{id}", delete(handler::delete_assignment))
        .layer(middleware::from_fn(require_permission("cleaning:manage")));

    read_routes.merge(manage_routes)
}
