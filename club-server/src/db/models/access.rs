//! Access Event Model (门禁记录)
//!
//! 每次刷卡产生一条记录，无论放行与否。
//! 前台门禁屏每 10 秒轮询最近记录渲染实时画面。

use super::{MemberId, SubscriptionId};
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Access event ID type
pub type AccessEventId = RecordId;

/// 拒绝原因 (放行时为 None)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccessDenyReason {
    /// 卡号不存在
    UnknownCard,
    /// 会员已停用
    MemberInactive,
    /// 无覆盖当天的有效订阅
    NoActiveSubscription,
}

impl std::fmt::Display for AccessDenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::UnknownCard => "unknown_card",
            Self::MemberInactive => "member_inactive",
            Self::NoActiveSubscription => "no_active_subscription",
        };
        write!(f, "{}", s)
    }
}

/// Access event entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessEvent {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AccessEventId>,

    /// 刷卡卡号 (原样记录，未知卡也保留)
    pub card_code: String,

    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub member: Option<MemberId>,

    /// 会员姓名快照 (未知卡为 None)
    pub member_name: Option<String>,

    /// 会员照片快照 (门禁屏展示用)
    pub photo_url: Option<String>,

    pub granted: bool,

    pub deny_reason: Option<AccessDenyReason>,

    /// 放行依据的订阅
    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub subscription: Option<SubscriptionId>,

    /// 刷卡时间 (Unix timestamp millis)
    pub timestamp: i64,
}
