//! Reservation API 模块 (课程预约)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/", get(handler::list));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/check-in", post(handler::check_in))
        .layer(middleware::from_fn(require_permission(
            "reservations:manage",
        )));

    read_routes.merge(manage_routes)
}
