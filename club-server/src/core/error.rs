use thiserror::Error;

/// 服务器生命周期错误 (启动/关闭阶段)
///
/// 请求处理阶段的错误走 [`crate::utils::AppError`]，这里只覆盖
/// HTTP 服务起来之前和之后的失败路径。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 生命周期代码的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
