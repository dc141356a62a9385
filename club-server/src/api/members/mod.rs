//! Member API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/members", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：无需权限检查（前台查询是基础操作）
    // axum 对字面段 /search 的匹配优先于参数段 /{id}
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/search", get(handler::search))
        .route("/{id}", get(handler::get_by_id));

    // 管理路由：需要 members:manage 权限
    // 会员不做硬删除，只有 deactivate
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .route("/{id}/deactivate", post(handler::deactivate))
        .layer(middleware::from_fn(require_permission("members:manage")));

    read_routes.merge(manage_routes)
}
