use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置 - 场馆节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HIERRO_WORK_DIR | ./data | 工作目录 |
/// | HIERRO_HOST | 0.0.0.0 | HTTP 监听地址 |
/// | HIERRO_PORT | 8080 | HTTP 服务端口 |
/// | HIERRO_ENV | development | 运行环境 |
/// | HIERRO_TIMEZONE | Europe/Madrid | 业务时区 |
/// | HIERRO_LOG_LEVEL | info | 日志级别 |
/// | HIERRO_LOG_DIR | (无) | 日志文件目录，未设置则仅输出到终端 |
/// | HIERRO_EXPIRY_SWEEP_TIME | 03:30 | 订阅过期扫描时刻 (HH:MM) |
/// | HIERRO_AUDIT_BUFFER | 256 | 审计日志通道容量 |
///
/// # 示例
///
/// ```ignore
/// HIERRO_WORK_DIR=/var/lib/hierro HIERRO_PORT=9000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、上传图片、日志等文件
    pub work_dir: String,
    /// HTTP 监听地址
    pub host: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 业务时区 (排课、门禁统计均按此时区解释日期)
    pub timezone: chrono_tz::Tz,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录
    pub log_dir: Option<String>,
    /// 订阅过期扫描的每日执行时刻 (HH:MM, 业务时区)
    pub expiry_sweep_time: String,
    /// 审计日志 mpsc 通道容量
    pub audit_buffer_size: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("HIERRO_WORK_DIR").unwrap_or_else(|_| "./data".into()),
            host: std::env::var("HIERRO_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: std::env::var("HIERRO_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt: JwtConfig::default(),
            environment: std::env::var("HIERRO_ENV").unwrap_or_else(|_| "development".into()),
            timezone: std::env::var("HIERRO_TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::Europe::Madrid),
            log_level: std::env::var("HIERRO_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("HIERRO_LOG_DIR").ok(),
            expiry_sweep_time: std::env::var("HIERRO_EXPIRY_SWEEP_TIME")
                .unwrap_or_else(|_| "03:30".into()),
            audit_buffer_size: std::env::var("HIERRO_AUDIT_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录: work_dir/database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 上传图片目录: work_dir/uploads/images
    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads/images")
    }

    /// 日志目录: work_dir/logs
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.uploads_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
