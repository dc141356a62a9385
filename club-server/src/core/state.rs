use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use crate::audit::{AuditLogRequest, AuditService, AuditStorage, AuditWorker};
use crate::auth::{JwtService, RateLimiter};
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, ServerError};
use crate::db::DbService;
use crate::services::SubscriptionExpirySweeper;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是场馆节点的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | audit | Arc<AuditService> | 审计日志服务 |
/// | rate_limiter | RateLimiter | 登录限流器 |
///
/// # 使用示例
///
/// ```ignore
/// // 获取数据库连接
/// let db = state.get_db();
///
/// // 记录审计日志
/// state.audit.log(action, "member", id, None, None, details).await;
/// ```
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 审计日志服务
    pub audit: Arc<AuditService>,
    /// 登录限流器
    pub rate_limiter: RateLimiter,
    /// 审计 worker 的接收端，start_background_tasks 取走后为 None
    audit_rx: Arc<Mutex<Option<mpsc::Receiver<AuditLogRequest>>>>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/hierro.db)，含 schema 与系统数据
    /// 3. 各服务 (Audit, JWT, RateLimiter)
    pub async fn initialize(config: &Config) -> Result<Self, ServerError> {
        // 0. Ensure work_dir structure exists
        config.ensure_work_dir_structure().map_err(|e| {
            ServerError::Config(format!("failed to create work directory structure: {e}"))
        })?;

        // 1. Initialize DB
        let db_path = config.database_dir().join("hierro.db");
        let db_path_str = db_path.to_string_lossy();

        let db_service = DbService::new(&db_path_str)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        let db = db_service.db;

        // 2. Initialize Services
        let (audit, audit_rx) = AuditService::new(db.clone(), config.audit_buffer_size);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let rate_limiter = RateLimiter::new();

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
            audit,
            rate_limiter,
            audit_rx: Arc::new(Mutex::new(Some(audit_rx))),
        })
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 审计日志 worker (Worker)
    /// - 订阅过期扫描 (Periodic)
    /// - 限流器清理 (Periodic)
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        // Audit worker: drains the mpsc channel into the hash chain
        let rx = self.audit_rx.lock().ok().and_then(|mut guard| guard.take());
        match rx {
            Some(rx) => {
                let storage = AuditStorage::new(self.db.clone());
                let shutdown = tasks.shutdown_token();
                tasks.spawn("audit_worker", TaskKind::Worker, async move {
                    AuditWorker::new(storage).run(rx, shutdown).await;
                });
            }
            None => {
                tracing::warn!("Audit worker already started, skipping");
            }
        }

        // Daily subscription expiry sweep
        let sweeper = SubscriptionExpirySweeper::new(self.clone());
        let shutdown = tasks.shutdown_token();
        tasks.spawn("subscription_expiry", TaskKind::Periodic, async move {
            sweeper.run(shutdown).await;
        });

        // Rate limiter window cleanup, every 5 minutes
        let limiter = self.rate_limiter.clone();
        let shutdown = tasks.shutdown_token();
        tasks.spawn("rate_limit_cleanup", TaskKind::Periodic, async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => limiter.cleanup(),
                    _ = shutdown.cancelled() => break,
                }
            }
        });

        tasks.log_summary();
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
