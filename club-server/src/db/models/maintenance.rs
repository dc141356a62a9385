//! Maintenance Record Model (维修工单)

use super::{AssetId, EmployeeId};
use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Maintenance record ID type
pub type MaintenanceRecordId = RecordId;

/// Maintenance kind (例行保养 vs 故障维修)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceKind {
    Preventive,
    Corrective,
}

/// Maintenance status
///
/// Open → InProgress → Closed；Open 可直接 Closed (现场即修)。
/// Cancelled 是放弃工单的终态 (误报、重复报修)。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    Open,
    InProgress,
    Closed,
    Cancelled,
}

impl MaintenanceStatus {
    /// Whether the work order is still pending (keeps the asset in maintenance)
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl Default for MaintenanceStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// Maintenance record entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MaintenanceRecordId>,

    #[serde(with = "serde_helpers::record_id")]
    pub asset: AssetId,

    /// 器材名称快照
    pub asset_name: String,

    pub kind: MaintenanceKind,

    pub description: String,

    #[serde(default)]
    pub status: MaintenanceStatus,

    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub reported_by: Option<EmployeeId>,
    pub reported_by_name: Option<String>,

    /// 报修时间 (Unix timestamp millis)
    pub opened_at: i64,
    pub started_at: Option<i64>,
    pub closed_at: Option<i64>,

    /// 维修结论
    pub resolution: Option<String>,

    /// 执行维修的人员/外部技师 (自由文本)
    pub technician: Option<String>,

    /// 维修费用
    pub cost: Option<Decimal>,
}

/// Create maintenance record payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub asset: AssetId,
    pub kind: MaintenanceKind,
    pub description: String,
}

/// Close maintenance record payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceClose {
    pub resolution: Option<String>,
    pub technician: Option<String>,
    pub cost: Option<Decimal>,
}
