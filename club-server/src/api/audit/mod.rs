//! Audit API 模块 (审计日志查询)
//!
//! 审计日志是追责依据，查询与链校验都只开放给管理员。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/audit-log", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::query))
        .route("/verify", get(handler::verify))
        .layer(middleware::from_fn(require_admin))
}
