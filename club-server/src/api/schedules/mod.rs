//! Schedule API 模块 (周课表模板与课次生成)

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/schedules", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    // 生成端点也归 schedule:manage：展开课次等同于发布课表
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .route("/{id}", delete(handler::delete_template))
        .route("/generate", post(handler::generate_all))
        .route("/{id}/generate", post(handler::generate_for_template))
        .layer(middleware::from_fn(require_permission("schedule:manage")));

    read_routes.merge(manage_routes)
}
