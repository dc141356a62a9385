//! Reservation Model (课程预约)

use super::{ClassSessionId, MemberId};
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Reservation ID type
pub type ReservationId = RecordId;

/// Reservation status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// 占用名额
    Active,
    /// 已取消，名额释放
    Cancelled,
    /// 已到场签到
    Attended,
}

impl Default for ReservationStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ReservationId>,

    #[serde(with = "serde_helpers::record_id")]
    pub session: ClassSessionId,

    #[serde(with = "serde_helpers::record_id")]
    pub member: MemberId,

    /// 会员姓名快照
    pub member_name: String,

    #[serde(default)]
    pub status: ReservationStatus,

    /// 预约时间 (Unix timestamp millis)
    pub reserved_at: i64,

    pub cancelled_at: Option<i64>,
    pub attended_at: Option<i64>,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub session: ClassSessionId,
    #[serde(with = "serde_helpers::record_id")]
    pub member: MemberId,
}
