//! Site Model (场馆)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Site ID type
pub type SiteId = RecordId;

/// Site entity — 一个物理场馆 (门店)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SiteId>,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// 营业时间描述 (自由文本，如 "L-V 7:00-23:00")
    pub opening_hours: Option<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create site payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteCreate {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub opening_hours: Option<String>,
}

/// Update site payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
