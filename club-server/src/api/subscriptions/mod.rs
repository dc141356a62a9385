//! Subscription API 模块 (会籍订阅)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/subscriptions", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list_by_member))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}/renew", post(handler::renew))
        .route("/{id}/cancel", post(handler::cancel))
        .layer(middleware::from_fn(require_permission(
            "subscriptions:manage",
        )));

    read_routes.merge(manage_routes)
}
