//! Sale Model (前台销售小票)
//!
//! 行项目内嵌在销售单里，金额全部服务端重算。
//! 销售单 append-only：没有更新/删除接口。

use super::{EmployeeId, MemberId};
use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Sale ID type
pub type SaleId = RecordId;

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Other,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
            Self::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

/// 销售行项目 (内嵌)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    /// 商品描述 (自由文本：水、毛巾、补剂等)
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// quantity * unit_price，服务端计算
    pub line_total: Decimal,
}

/// Sale entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SaleId>,

    /// 小票号 (snowflake，打印在凭条上)
    pub receipt_number: String,

    pub lines: Vec<SaleLine>,

    /// 总金额，服务端计算
    pub total: Decimal,

    pub payment_method: PaymentMethod,

    /// 关联会员 (可选，散客为 None)
    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub member: Option<MemberId>,
    pub member_name: Option<String>,

    /// 收银员
    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub sold_by: Option<EmployeeId>,
    pub sold_by_name: Option<String>,

    /// 成交时间 (Unix timestamp millis)
    pub sold_at: i64,
}

/// 销售行项目请求 (金额由服务端计算)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLineCreate {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Create sale payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleCreate {
    pub lines: Vec<SaleLineCreate>,
    pub payment_method: PaymentMethod,
    #[serde(
        default,
        with = "serde_helpers::option_record_id"
    )]
    pub member: Option<MemberId>,
}
