//! Access Event Repository
//!
//! 门禁事件只追加，永不修改。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{AccessDenyReason, AccessEvent};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// A door check-in decision to be recorded.
#[derive(Debug, Clone)]
pub struct AccessEventInsert {
    pub card_code: String,
    pub member: Option<RecordId>,
    pub member_name: Option<String>,
    pub photo_url: Option<String>,
    pub granted: bool,
    pub deny_reason: Option<AccessDenyReason>,
    pub subscription: Option<RecordId>,
}

#[derive(Clone)]
pub struct AccessEventRepository {
    base: BaseRepository,
}

impl AccessEventRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append one access event
    pub async fn record(&self, data: AccessEventInsert) -> RepoResult<AccessEvent> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE access_event SET
                    card_code = $card_code,
                    member = $member,
                    member_name = $member_name,
                    photo_url = $photo_url,
                    granted = $granted,
                    deny_reason = $deny_reason,
                    subscription = $subscription,
                    timestamp = $timestamp
                RETURN AFTER"#,
            )
            .bind(("card_code", data.card_code))
            .bind(("member", data.member))
            .bind(("member_name", data.member_name))
            .bind(("photo_url", data.photo_url))
            .bind(("granted", data.granted))
            .bind(("deny_reason", data.deny_reason))
            .bind(("subscription", data.subscription))
            .bind(("timestamp", now_millis()))
            .await?;

        let created: Option<AccessEvent> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to record access event".to_string()))
    }

    /// Most recent events, newest first
    pub async fn find_recent(&self, limit: u32) -> RepoResult<Vec<AccessEvent>> {
        let limit = limit.clamp(1, 200);
        let events: Vec<AccessEvent> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM access_event ORDER BY timestamp DESC LIMIT {}",
                limit
            ))
            .await?
            .take(0)?;
        Ok(events)
    }

    /// Events for one member, newest first
    pub async fn find_by_member(
        &self,
        member: RecordId,
        limit: u32,
    ) -> RepoResult<Vec<AccessEvent>> {
        let limit = limit.clamp(1, 200);
        let events: Vec<AccessEvent> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM access_event WHERE member = $member ORDER BY timestamp DESC LIMIT {}",
                limit
            ))
            .bind(("member", member))
            .await?
            .take(0)?;
        Ok(events)
    }

    /// Count events inside [start, end), optionally by outcome
    pub async fn count_in_range(
        &self,
        start: i64,
        end: i64,
        granted: Option<bool>,
    ) -> RepoResult<u64> {
        let mut conditions = vec!["timestamp >= $start", "timestamp < $end"];
        if granted.is_some() {
            conditions.push("granted = $granted");
        }
        let sql = format!(
            "SELECT count() AS total FROM access_event WHERE {} GROUP ALL",
            conditions.join(" AND ")
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("start", start))
            .bind(("end", end));
        if let Some(granted) = granted {
            query = query.bind(("granted", granted));
        }

        let mut result = query.await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }

    /// Count distinct members who entered inside [start, end)
    pub async fn count_unique_members_in_range(&self, start: i64, end: i64) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                r#"LET $entries = (SELECT member FROM access_event WHERE timestamp >= $start AND timestamp < $end AND granted = true AND member != NONE);
                RETURN array::len(array::distinct($entries.member))"#,
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let count: Option<u64> = result.take(1)?;
        Ok(count.unwrap_or(0))
    }
}

#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}
