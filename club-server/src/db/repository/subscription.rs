//! Subscription Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Subscription, SubscriptionStatus};
use rust_decimal::Decimal;
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct SubscriptionRepository {
    base: BaseRepository,
}

impl SubscriptionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// A member's subscriptions, newest period first
    pub async fn find_by_member(&self, member: RecordId) -> RepoResult<Vec<Subscription>> {
        let subscriptions: Vec<Subscription> = self
            .base
            .db()
            .query("SELECT * FROM subscription WHERE member = $member ORDER BY start_date DESC")
            .bind(("member", member))
            .await?
            .take(0)?;
        Ok(subscriptions)
    }

    /// Find subscription by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Subscription>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let subscription: Option<Subscription> = self.base.db().select(thing).await?;
        Ok(subscription)
    }

    /// Any active subscription of the member overlapping [start, end]
    ///
    /// Dates are "YYYY-MM-DD" strings, so plain string comparison orders
    /// them correctly.
    pub async fn find_overlapping_active(
        &self,
        member: RecordId,
        start_date: &str,
        end_date: &str,
    ) -> RepoResult<Option<Subscription>> {
        let subscription: Option<Subscription> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM subscription
                WHERE member = $member
                    AND status = 'ACTIVE'
                    AND start_date <= $end
                    AND end_date >= $start
                LIMIT 1"#,
            )
            .bind(("member", member))
            .bind(("start", start_date.to_string()))
            .bind(("end", end_date.to_string()))
            .await?
            .take(0)?;
        Ok(subscription)
    }

    /// The member's active subscription covering a date, if any
    pub async fn find_active_covering(
        &self,
        member: RecordId,
        date: &str,
    ) -> RepoResult<Option<Subscription>> {
        let subscription: Option<Subscription> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM subscription
                WHERE member = $member
                    AND status = 'ACTIVE'
                    AND start_date <= $date
                    AND end_date >= $date
                LIMIT 1"#,
            )
            .bind(("member", member))
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(subscription)
    }

    /// Create an active subscription with the member name snapshotted
    pub async fn create(
        &self,
        member: RecordId,
        member_name: String,
        plan: String,
        price: Decimal,
        start_date: String,
        end_date: String,
    ) -> RepoResult<Subscription> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE subscription SET
                    member = $member,
                    member_name = $member_name,
                    plan = $plan,
                    price = $price,
                    start_date = $start_date,
                    end_date = $end_date,
                    status = 'ACTIVE',
                    created_at = $created_at,
                    cancelled_at = NONE
                RETURN AFTER"#,
            )
            .bind(("member", member))
            .bind(("member_name", member_name))
            .bind(("plan", plan))
            .bind(("price", price))
            .bind(("start_date", start_date))
            .bind(("end_date", end_date))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<Subscription> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create subscription".to_string()))
    }

    /// Cancel an active subscription
    pub async fn cancel(&self, id: &str) -> RepoResult<Subscription> {
        let subscription = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Subscription {} not found", id)))?;
        if subscription.status != SubscriptionStatus::Active {
            return Err(RepoError::Validation(format!(
                "Only active subscriptions can be cancelled, current status: {:?}",
                subscription.status
            )));
        }

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    status = 'CANCELLED',
                    cancelled_at = $cancelled_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("cancelled_at", now_millis()))
            .await?;

        result
            .take::<Option<Subscription>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Subscription {} not found", id)))
    }

    /// Flip every active subscription whose period ended before today to
    /// EXPIRED, returning the affected records
    pub async fn expire_overdue(&self, today: &str) -> RepoResult<Vec<Subscription>> {
        let expired: Vec<Subscription> = self
            .base
            .db()
            .query(
                r#"UPDATE subscription SET
                    status = 'EXPIRED'
                WHERE status = 'ACTIVE' AND end_date < $today
                RETURN AFTER"#,
            )
            .bind(("today", today.to_string()))
            .await?
            .take(0)?;
        Ok(expired)
    }

    /// Count active subscriptions
    pub async fn count_active(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM subscription WHERE status = 'ACTIVE' GROUP ALL")
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }

    /// Count active subscriptions ending on or before a cutoff date
    pub async fn count_expiring_by(&self, today: &str, cutoff: &str) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT count() AS total FROM subscription
                WHERE status = 'ACTIVE' AND end_date >= $today AND end_date <= $cutoff
                GROUP ALL"#,
            )
            .bind(("today", today.to_string()))
            .bind(("cutoff", cutoff.to_string()))
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }
}

#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}
