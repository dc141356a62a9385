//! 审计日志后台 Worker
//!
//! 从 mpsc 通道消费 AuditLogRequest，写入 SurrealDB。
//! 收到 shutdown 信号后先排空队列再退出，已入队的审计日志不丢失。

use tokio_util::sync::CancellationToken;

use super::service::AuditLogRequest;
use super::storage::AuditStorage;

/// 审计日志后台 Worker
///
/// 从 mpsc 通道消费日志请求，写入 SurrealDB 存储。
pub struct AuditWorker {
    storage: AuditStorage,
}

impl AuditWorker {
    pub fn new(storage: AuditStorage) -> Self {
        Self { storage }
    }

    /// 运行 worker（阻塞直到通道关闭或收到 shutdown 信号）
    pub async fn run(
        self,
        mut rx: tokio::sync::mpsc::Receiver<AuditLogRequest>,
        shutdown: CancellationToken,
    ) {
        tracing::info!("📋 Audit log worker started");

        loop {
            tokio::select! {
                req = rx.recv() => match req {
                    Some(req) => self.write(req).await,
                    None => {
                        tracing::info!("Audit log channel closed, worker stopping");
                        return;
                    }
                },
                _ = shutdown.cancelled() => {
                    // 拒绝新消息，排空已入队的
                    rx.close();
                    while let Some(req) = rx.recv().await {
                        self.write(req).await;
                    }
                    tracing::info!("Audit log worker drained and stopped");
                    return;
                }
            }
        }
    }

    async fn write(&self, req: AuditLogRequest) {
        match self
            .storage
            .append(
                req.action,
                req.resource_type,
                req.resource_id,
                req.operator_id,
                req.operator_name,
                req.details,
            )
            .await
        {
            Ok(entry) => {
                tracing::debug!(
                    audit_id = entry.id,
                    action = %entry.action,
                    resource = %entry.resource_type,
                    "Audit entry recorded"
                );
            }
            Err(e) => {
                tracing::error!("Failed to write audit entry: {:?}", e);
            }
        }
    }
}
