//! Member Model (会员)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Member ID type
pub type MemberId = RecordId;

/// Member status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Active,
    Inactive,
}

impl Default for MemberStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Member entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MemberId>,

    /// 会员卡号 (唯一，刷卡入场使用)
    pub card_code: String,

    pub first_name: String,
    pub last_name: String,

    pub email: Option<String>,
    pub phone: Option<String>,

    /// 出生日期 (YYYY-MM-DD)
    pub birth_date: Option<String>,

    /// 会员照片 (上传后的 URL)
    pub photo_url: Option<String>,

    pub note: Option<String>,

    #[serde(default)]
    pub status: MemberStatus,

    /// 入会时间 (Unix timestamp millis)
    pub joined_at: i64,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

/// Create member payload
///
/// 卡号可选：缺省时由服务端生成（前台只需录入姓名即可建档发卡）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub card_code: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub photo_url: Option<String>,
    pub note: Option<String>,
}

/// Update member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
}
