//! Class Session Model (课次)
//!
//! 模板展开后的具体一节课。活动名、分区名、教练名在生成时快照，
//! 模板后续修改不影响已生成的课次。

use super::{EmployeeId, ScheduleTemplateId, SpaceId};
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Class session ID type
pub type ClassSessionId = RecordId;

/// Session status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::Scheduled
    }
}

/// Class session entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSession {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ClassSessionId>,

    /// 来源模板；(template, date) 全局唯一，保证重复展开幂等
    #[serde(with = "serde_helpers::record_id")]
    pub template: ScheduleTemplateId,

    /// 上课日期 (YYYY-MM-DD)
    pub date: String,

    /// 活动名称快照
    pub activity: String,

    #[serde(with = "serde_helpers::record_id")]
    pub space: SpaceId,
    /// 分区名称快照
    pub space_name: String,

    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub coach: Option<EmployeeId>,
    /// 教练姓名快照
    pub coach_name: Option<String>,

    /// 开始时刻快照 (HH:MM)
    pub start_time: String,
    /// 结束时刻快照 (HH:MM)
    pub end_time: String,

    /// 容量快照 (模板容量，缺省回退分区容量)
    pub capacity: u32,

    #[serde(default)]
    pub status: SessionStatus,

    /// 取消原因
    pub cancellation_reason: Option<String>,

    pub created_at: Option<i64>,
}
