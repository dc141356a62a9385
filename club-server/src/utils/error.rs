//! 统一错误处理
//!
//! 错误类型定义在 `shared::error`，这里统一 re-export，
//! 服务端代码一律通过 `crate::utils::{AppError, AppResult}` 引用。
//!
//! # 错误码规范
//!
//! | 范围 | 分类 |
//! |------|------|
//! | 0-999 | 通用错误 |
//! | 1xxx | 认证错误 |
//! | 2xxx | 权限错误 |
//! | 3xxx | 会员错误 |
//! | 4xxx | 排课错误 |
//! | 5xxx | 预约错误 |
//! | 6xxx | 场馆/设施错误 |
//! | 7xxx | 销售/订阅错误 |
//! | 8xxx | 员工/角色错误 |
//! | 9xxx | 系统错误 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Member not found"))
//!
//! // 返回成功响应
//! Ok(Json(member))
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
