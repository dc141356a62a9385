//! Maintenance API 模块 (维修工单)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/maintenance", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::open))
        .route("/{id}/start", post(handler::start))
        .route("/{id}/close", post(handler::close))
        .route("/{id}/cancel", post(handler::cancel))
        .layer(middleware::from_fn(require_permission("maintenance:manage")));

    read_routes.merge(manage_routes)
}
