//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`auth`] - 认证相关接口
//! - [`roles`] - 角色管理接口
//! - [`employees`] - 员工管理接口
//! - [`upload`] - 图片上传接口
//! - [`members`] - 会员管理接口
//! - [`access`] - 门禁刷卡接口
//! - [`subscriptions`] - 会籍订阅接口
//! - [`sites`] - 场馆管理接口
//! - [`spaces`] - 空间管理接口
//! - [`schedules`] - 课程模板与排课生成接口
//! - [`sessions`] - 课次管理接口
//! - [`reservations`] - 课程预约接口
//! - [`sales`] - 前台销售接口
//! - [`assets`] - 资产管理接口
//! - [`maintenance`] - 维修工单接口
//! - [`cleaning`] - 清洁任务接口
//! - [`dashboard`] - 仪表盘与报表接口
//! - [`audit`] - 审计日志查询接口

pub mod auth;
pub mod health;
pub mod roles;
pub mod employees;
pub mod upload;

// Members and door access
pub mod members;
pub mod access;
pub mod subscriptions;

// Facility layout
pub mod sites;
pub mod spaces;

// Class scheduling
pub mod schedules;
pub mod sessions;
pub mod reservations;

// Point of sale
pub mod sales;

// Equipment and upkeep
pub mod assets;
pub mod maintenance;
pub mod cleaning;

// Reporting
pub mod dashboard;
pub mod audit;
