//! Sale Repository
//!
//! 销售记录只追加，金额永不改写。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{PaymentMethod, Sale, SaleLine};
use rust_decimal::Decimal;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// A fully computed sale ready to be written.
///
/// Line totals, the grand total and the receipt number are computed by the
/// caller before the record is persisted.
#[derive(Debug, Clone)]
pub struct SaleInsert {
    pub receipt_number: String,
    pub lines: Vec<SaleLine>,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub member: Option<RecordId>,
    pub member_name: Option<String>,
    pub sold_by: Option<RecordId>,
    pub sold_by_name: Option<String>,
    pub sold_at: i64,
}

#[derive(Clone)]
pub struct SaleRepository {
    base: BaseRepository,
}

impl SaleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append one sale record
    pub async fn create(&self, data: SaleInsert) -> RepoResult<Sale> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE sale SET
                    receipt_number = $receipt_number,
                    lines = $lines,
                    total = $total,
                    payment_method = $payment_method,
                    member = $member,
                    member_name = $member_name,
                    sold_by = $sold_by,
                    sold_by_name = $sold_by_name,
                    sold_at = $sold_at
                RETURN AFTER"#,
            )
            .bind(("receipt_number", data.receipt_number))
            .bind(("lines", data.lines))
            .bind(("total", data.total))
            .bind(("payment_method", data.payment_method))
            .bind(("member", data.member))
            .bind(("member_name", data.member_name))
            .bind(("sold_by", data.sold_by))
            .bind(("sold_by_name", data.sold_by_name))
            .bind(("sold_at", data.sold_at))
            .await?;

        let created: Option<Sale> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create sale".to_string()))
    }

    /// Find sale by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Sale>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let sale: Option<Sale> = self.base.db().select(thing).await?;
        Ok(sale)
    }

    /// Page through sales inside [start, end), newest first
    pub async fn find_in_range(
        &self,
        start: i64,
        end: i64,
        limit: u32,
        offset: u32,
    ) -> RepoResult<(Vec<Sale>, u64)> {
        let sql = format!(
            r#"SELECT count() AS total FROM sale WHERE sold_at >= $start AND sold_at < $end GROUP ALL;
            SELECT * FROM sale WHERE sold_at >= $start AND sold_at < $end ORDER BY sold_at DESC LIMIT {} START {}"#,
            limit, offset
        );

        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("start", start))
            .bind(("end", end))
            .await?;

        let count: Option<CountResult> = result.take(0)?;
        let sales: Vec<Sale> = result.take(1)?;
        Ok((sales, count.map(|c| c.total).unwrap_or(0)))
    }

    /// Revenue total inside [start, end)
    pub async fn sum_in_range(&self, start: i64, end: i64) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT math::sum(total) AS revenue FROM sale WHERE sold_at >= $start AND sold_at < $end GROUP ALL",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let sum: Option<RevenueResult> = result.take(0)?;
        Ok(sum.map(|r| r.revenue).unwrap_or(0.0))
    }

    /// Per payment method order count and revenue inside [start, end)
    pub async fn breakdown_by_method(
        &self,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<MethodRevenue>> {
        let rows: Vec<MethodRevenue> = self
            .base
            .db()
            .query(
                "SELECT payment_method, count() AS orders, math::sum(total) AS revenue \
                 FROM sale WHERE sold_at >= $start AND sold_at < $end \
                 GROUP BY payment_method ORDER BY revenue DESC",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(rows)
    }
}

/// 单个支付方式的聚合结果
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MethodRevenue {
    pub payment_method: PaymentMethod,
    pub orders: u64,
    pub revenue: f64,
}

#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}

#[derive(Debug, serde::Deserialize)]
struct RevenueResult {
    revenue: f64,
}
