//! Space Model (功能分区)
//!
//! 场馆内的可预约分区：训练舱、泳道、球场、教室等。

use super::SiteId;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Space ID type
pub type SpaceId = RecordId;

/// Space entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SpaceId>,
    #[serde(with = "serde_helpers::record_id")]
    pub site: SiteId,
    pub name: String,
    /// 分区类型 (自由文本，如 "sala", "piscina", "pista")
    pub kind: Option<String>,
    /// 默认容量 — 排课未指定容量时的上限
    pub capacity: u32,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create space payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub site: SiteId,
    pub name: String,
    pub kind: Option<String>,
    pub capacity: u32,
}

/// Update space payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
