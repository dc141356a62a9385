//! 服务层 - 服务器核心服务
//!
//! # 服务列表
//!
//! - [`http`] - HTTP 服务组装与监听
//! - [`SubscriptionExpirySweeper`] - 订阅过期扫描调度器

pub mod expiry;
pub mod http;

pub use expiry::SubscriptionExpirySweeper;
