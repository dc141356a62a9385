//! Subscription Model (会员订阅)
//!
//! 订阅覆盖一个日期区间 [start_date, end_date] (含两端)。
//! 门禁放行只认状态为 Active 且日期区间覆盖当天的订阅。

use super::MemberId;
use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Subscription ID type
pub type SubscriptionId = RecordId;

/// Subscription status
///
/// Active → Expired (每日扫描) / Cancelled (人工)。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Subscription entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SubscriptionId>,

    #[serde(with = "serde_helpers::record_id")]
    pub member: MemberId,

    /// 会员姓名快照
    pub member_name: String,

    /// 套餐名 (自由文本：mensual, trimestral, anual...)
    pub plan: String,

    pub price: Decimal,

    /// 生效日期 (YYYY-MM-DD, 含)
    pub start_date: String,
    /// 截止日期 (YYYY-MM-DD, 含)
    pub end_date: String,

    #[serde(default)]
    pub status: SubscriptionStatus,

    pub created_at: Option<i64>,
    pub cancelled_at: Option<i64>,
}

impl Subscription {
    /// 日期区间是否覆盖给定日期 (YYYY-MM-DD 字符串按字典序比较)
    pub fn covers(&self, date: &str) -> bool {
        self.start_date.as_str() <= date && date <= self.end_date.as_str()
    }

    /// 给定日期是否可凭此订阅入场
    pub fn grants_access_on(&self, date: &str) -> bool {
        self.status == SubscriptionStatus::Active && self.covers(date)
    }
}

/// Create subscription payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub member: MemberId,
    pub plan: String,
    pub price: Decimal,
    pub start_date: String,
    pub end_date: String,
}

/// Renew subscription payload
///
/// 新周期默认上一周期结束次日生效，套餐/价格默认沿用。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionRenew {
    pub plan: Option<String>,
    pub price: Option<Decimal>,
    /// 新周期天数；缺省沿用上一周期的天数
    pub days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(status: SubscriptionStatus) -> Subscription {
        Subscription {
            id: None,
            member: "member:ana".parse().unwrap(),
            member_name: "Ana García".into(),
            plan: "mensual".into(),
            price: Decimal::new(3500, 2),
            start_date: "2025-06-01".into(),
            end_date: "2025-06-30".into(),
            status,
            created_at: None,
            cancelled_at: None,
        }
    }

    #[test]
    fn test_covers_inclusive_bounds() {
        let s = sub(SubscriptionStatus::Active);
        assert!(s.covers("2025-06-01"));
        assert!(s.covers("2025-06-30"));
        assert!(!s.covers("2025-05-31"));
        assert!(!s.covers("2025-07-01"));
    }

    #[test]
    fn test_grants_access_requires_active_status() {
        assert!(sub(SubscriptionStatus::Active).grants_access_on("2025-06-15"));
        assert!(!sub(SubscriptionStatus::Expired).grants_access_on("2025-06-15"));
        assert!(!sub(SubscriptionStatus::Cancelled).grants_access_on("2025-06-15"));
    }
}
