//! Audit API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::audit::{AuditChainVerification, AuditListResponse, AuditQuery};
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/audit-log - 按条件分页查询审计日志
///
/// 支持 from/to (Unix 毫秒)、action、operator_id、resource_type 过滤。
pub async fn query(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<AuditListResponse>> {
    let (items, total) = state.audit.query(&query).await?;
    Ok(Json(AuditListResponse { items, total }))
}

/// GET /api/audit-log/verify - 校验审计链完整性
///
/// 逐条重算哈希链，返回断裂点列表。空链视为完整。
pub async fn verify(
    State(state): State<ServerState>,
) -> AppResult<Json<AuditChainVerification>> {
    let verification = state.audit.verify_chain().await?;
    Ok(Json(verification))
}
