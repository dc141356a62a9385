//! Cleaning Models (清洁任务与排班)

use super::{EmployeeId, SpaceId};
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Cleaning task ID type
pub type CleaningTaskId = RecordId;
/// Cleaning assignment ID type
pub type CleaningAssignmentId = RecordId;

/// 清洁任务定义 (可复用：擦镜子、拖更衣室...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningTask {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CleaningTaskId>,
    pub name: String,
    pub description: Option<String>,
    /// 目标分区 (可选，全馆任务为 None)
    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub space: Option<SpaceId>,
    /// 建议频次，自由文本 (diaria, semanal...)，排班时参考
    pub frequency: Option<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create cleaning task payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningTaskCreate {
    pub name: String,
    pub description: Option<String>,
    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub space: Option<SpaceId>,
    pub frequency: Option<String>,
}

/// Update cleaning task payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningTaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub space: Option<SpaceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Assignment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CleaningStatus {
    Pending,
    Done,
}

impl Default for CleaningStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// 某天把某个任务派给某位清洁员
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningAssignment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CleaningAssignmentId>,

    #[serde(with = "serde_helpers::record_id")]
    pub task: CleaningTaskId,
    /// 任务名快照
    pub task_name: String,

    #[serde(with = "serde_helpers::record_id")]
    pub employee: EmployeeId,
    /// 员工姓名快照
    pub employee_name: String,

    /// 执行日期 (YYYY-MM-DD)
    pub date: String,

    #[serde(default)]
    pub status: CleaningStatus,

    /// 完成时间 (Unix timestamp millis)
    pub completed_at: Option<i64>,

    pub note: Option<String>,
}

/// Create cleaning assignment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningAssignmentCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub task: CleaningTaskId,
    #[serde(with = "serde_helpers::record_id")]
    pub employee: EmployeeId,
    pub date: String,
    pub note: Option<String>,
}
