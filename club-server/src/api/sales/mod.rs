//! Sales API 模块 (前台销售)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sales", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let register_routes = Router::new()
        .route("/", post(handler::register))
        .layer(middleware::from_fn(require_permission("sales:register")));

    read_routes.merge(register_routes)
}
