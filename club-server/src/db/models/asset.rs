//! Asset Model (器材/设备)

use super::SpaceId;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Asset ID type
pub type AssetId = RecordId;

/// Asset status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Operational,
    InMaintenance,
    /// 终态，不可恢复
    Retired,
}

impl Default for AssetStatus {
    fn default() -> Self {
        Self::Operational
    }
}

/// Asset entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AssetId>,

    pub name: String,

    /// 器材类别 (自由文本，如 "cardio", "fuerza")
    pub category: Option<String>,

    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub space: Option<SpaceId>,

    pub serial_number: Option<String>,

    /// 采购日期 (YYYY-MM-DD)
    pub purchased_at: Option<String>,

    #[serde(default)]
    pub status: AssetStatus,

    pub note: Option<String>,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Create asset payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCreate {
    pub name: String,
    pub category: Option<String>,
    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub space: Option<SpaceId>,
    pub serial_number: Option<String>,
    pub purchased_at: Option<String>,
    pub note: Option<String>,
}

/// Update asset payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub space: Option<SpaceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
