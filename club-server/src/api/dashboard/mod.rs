//! Dashboard API 模块 (运营看板)

mod handler;

use axum::{
    Router,
    middleware,
    routing::get,
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dashboard", routes())
}

fn routes() -> Router<ServerState> {
    // 报表查看：需要 reports:view 权限
    Router::new()
        .route("/", get(handler::get_summary))
        .route("/access-trend", get(handler::get_access_trend))
        .route("/top-activities", get(handler::get_top_activities))
        .route("/sales-breakdown", get(handler::get_sales_breakdown))
        .layer(middleware::from_fn(require_permission("reports:view")))
}
