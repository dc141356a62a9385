//! Hierro Club Server - 健身房门店管理系统服务端
//!
//! # 架构概述
//!
//! 单体服务端，为前台 SPA 提供 REST API：
//!
//! - **认证** (`auth`): JWT + Argon2 认证体系，权限目录
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 (模型 + 仓储)
//! - **排课** (`scheduling`): 周课表模板展开成具体课次
//! - **审计** (`audit`): 哈希链审计日志
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! club-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # JWT 认证、权限、登录限流
//! ├── api/           # HTTP 路由和处理器
//! ├── audit/         # 审计日志 (哈希链 + 异步 worker)
//! ├── scheduling/    # 课表模板展开
//! ├── services/      # HTTP 服务、会籍过期扫描
//! ├── db/            # 数据库层 (schema、模型、仓储)
//! └── utils/         # 工具函数 (时间、校验、日志)
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod scheduling;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 进程环境准备：.env、工作目录、日志
///
/// 在加载配置之前调用一次。开发环境日志打到控制台，
/// 生产环境写到日志目录 (按天滚动)。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 可选，缺失不报错
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    if config.is_production() {
        // 显式 HIERRO_LOG_DIR 优先，否则落到 work_dir/logs
        let log_dir = config
            .log_dir
            .clone()
            .unwrap_or_else(|| config.logs_dir().to_string_lossy().into_owned());
        init_logger_with_file(Some(&config.log_level), Some(&log_dir));
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   __ ___
  / // (_)__ _______ ___
 / _  / / -_) __/ __/ _ \
/_//_/_/\__/_/ /_/  \___/
   _____ __     __
  / ___// /_ __/ /
 / /__ / / // / _ \
 \___//_/\_,_/_.__/
    "#
    );
}
