//! Schedule Template Model (周课表模板)
//!
//! 模板描述"每周几、什么时段、哪个分区、哪位教练"的重复性课程，
//! 在有效期内按需展开为具体日期的课次 ([`super::ClassSession`])。

use super::{EmployeeId, SpaceId};
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Schedule template ID type
pub type ScheduleTemplateId = RecordId;

/// 将 0-6 (周一=0) 转换为 chrono::Weekday
pub fn chrono_weekday(weekday: u8) -> Option<chrono::Weekday> {
    use chrono::Weekday::*;
    Some(match weekday {
        0 => Mon,
        1 => Tue,
        2 => Wed,
        3 => Thu,
        4 => Fri,
        5 => Sat,
        6 => Sun,
        _ => return None,
    })
}

/// Schedule template entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTemplate {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ScheduleTemplateId>,

    /// 活动名称 (如 "Spinning", "Yoga", "CrossFit")
    pub activity: String,

    #[serde(with = "serde_helpers::record_id")]
    pub space: SpaceId,

    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub coach: Option<EmployeeId>,

    /// 星期几: 0 = 周一 .. 6 = 周日
    pub weekday: u8,

    /// 开始时刻 (HH:MM)
    pub start_time: String,
    /// 结束时刻 (HH:MM)
    pub end_time: String,

    /// 容量上限；未设置时回退到分区容量
    pub capacity: Option<u32>,

    /// 有效期起始 (YYYY-MM-DD, 含)
    pub valid_from: String,
    /// 有效期结束 (YYYY-MM-DD, 含)
    pub valid_until: String,

    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,

    pub created_at: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Create schedule template payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTemplateCreate {
    pub activity: String,
    #[serde(with = "serde_helpers::record_id")]
    pub space: SpaceId,
    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub coach: Option<EmployeeId>,
    pub weekday: u8,
    pub start_time: String,
    pub end_time: String,
    pub capacity: Option<u32>,
    pub valid_from: String,
    pub valid_until: String,
}

/// Update schedule template payload
///
/// 仅影响模板本身和之后的展开，已生成的课次保持不变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTemplateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub coach: Option<EmployeeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrono_weekday_mapping() {
        assert_eq!(chrono_weekday(0), Some(chrono::Weekday::Mon));
        assert_eq!(chrono_weekday(6), Some(chrono::Weekday::Sun));
        assert_eq!(chrono_weekday(7), None);
    }
}
