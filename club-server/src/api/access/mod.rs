//! 门禁 API 模块
//!
//! 刷卡判定 + 实时门禁屏数据。前台门禁屏轮询 `/api/access/recent`。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/access", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/check-in", post(handler::check_in))
        .route("/recent", get(handler::recent))
        .route("/member/{id}", get(handler::member_history))
        .route("/today", get(handler::today_summary))
        .route_layer(middleware::from_fn(require_permission("access:monitor")))
}
