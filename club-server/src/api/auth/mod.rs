//! Authentication Routes

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::login_rate_limit;
use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/login: public (no auth required, rate limited per IP)
/// - /api/auth/me, /api/auth/logout: require authentication (handled by
///   the global require_auth middleware)
///
/// Takes the state up front because the rate limit layer needs it.
pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route(
            "/api/auth/login",
            post(handler::login)
                .layer(middleware::from_fn_with_state(state, login_rate_limit)),
        )
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
}
