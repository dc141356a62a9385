//! Asset API 模块 (器材/设备)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/assets", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    // 器材不做硬删除，报废 (retire) 是终态
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .route("/{id}/status", post(handler::set_status))
        .route("/{id}/retire", post(handler::retire))
        .layer(middleware::from_fn(require_permission("assets:manage")));

    read_routes.merge(manage_routes)
}
