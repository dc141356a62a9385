//! HTTP 服务组装
//!
//! 拼装所有 API 路由、认证中间件和 Tower 中间件，
//! 绑定 TCP 端口并提供 graceful shutdown。

use axum::extract::{MatchedPath, Request};
use axum::response::Response;
use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::utils::AppError;

/// Request ID generator (uuid v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// HTTP 请求日志中间件
///
/// 记录请求 ID、方法、路径、认证用户、状态码和延迟。
/// 5xx/4xx 用 warn 级别，便于在日志里直接过滤异常请求。
async fn log_request(req: Request, next: middleware::Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    // 认证中间件在更外层，此处已能看到注入的用户
    let user = req
        .extensions()
        .get::<crate::auth::CurrentUser>()
        .map(|u| format!("{}({})", u.username, u.id));

    let response = next.run(req).await;

    let latency = start.elapsed();
    let status = response.status();

    if status.is_server_error() || status.is_client_error() {
        tracing::warn!(
            target: "http_access",
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            user = ?user,
            "Request failed"
        );
    } else {
        tracing::info!(
            target: "http_access",
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            user = ?user,
            "Request completed"
        );
    }

    response
}

/// Build the Axum router (state is attached later by `build_router`)
///
/// auth router 需要单独接收 state：登录限流中间件用 from_fn_with_state。
pub fn build_app(state: ServerState) -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::auth::router(state))
        .merge(crate::api::health::router())
        .merge(crate::api::roles::router())
        .merge(crate::api::employees::router())
        .merge(crate::api::upload::router())
        // Members and door access
        .merge(crate::api::members::router())
        .merge(crate::api::access::router())
        .merge(crate::api::subscriptions::router())
        // Facility layout
        .merge(crate::api::sites::router())
        .merge(crate::api::spaces::router())
        // Class scheduling
        .merge(crate::api::schedules::router())
        .merge(crate::api::sessions::router())
        .merge(crate::api::reservations::router())
        // Point of sale
        .merge(crate::api::sales::router())
        // Equipment and upkeep
        .merge(crate::api::assets::router())
        .merge(crate::api::maintenance::router())
        .merge(crate::api::cleaning::router())
        // Reporting
        .merge(crate::api::dashboard::router())
        .merge(crate::api::audit::router())
}

/// Assemble the full middleware stack around the router
///
/// `.layer()` 后添加的在外层：请求顺序为
/// 认证 → request-id 生成/回传 → 访问日志 → trace → 压缩 → CORS → 路由。
pub fn build_router(state: ServerState) -> Router {
    build_app(state.clone())
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
        // Request ID - 生成后回传到响应头 (Set 在 Propagate 外层才能被其读到)
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // JWT 认证中间件 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

/// Bind the address and serve until the shutdown future resolves
///
/// `ConnectInfo` is attached so the login rate limiter can fall back to
/// the peer address when no `X-Forwarded-For` header is present.
pub async fn serve<F>(state: ServerState, addr: &str, shutdown_signal: F) -> Result<(), AppError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
