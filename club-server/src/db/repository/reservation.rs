//! Reservation Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Reservation, ReservationStatus};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List reservations for a session
    pub async fn find_by_session(
        &self,
        session: RecordId,
        active_only: bool,
    ) -> RepoResult<Vec<Reservation>> {
        let sql = if active_only {
            "SELECT * FROM reservation WHERE session = $session AND status = 'ACTIVE' ORDER BY reserved_at"
        } else {
            "SELECT * FROM reservation WHERE session = $session ORDER BY reserved_at"
        };
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(sql)
            .bind(("session", session))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// List a member's reservations, newest first
    pub async fn find_by_member(&self, member: RecordId) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query("SELECT * FROM reservation WHERE member = $member ORDER BY reserved_at DESC")
            .bind(("member", member))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Find reservation by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let reservation: Option<Reservation> = self.base.db().select(thing).await?;
        Ok(reservation)
    }

    /// The member's active reservation on a session, if any
    pub async fn find_active_for(
        &self,
        session: RecordId,
        member: RecordId,
    ) -> RepoResult<Option<Reservation>> {
        let reservation: Option<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation WHERE session = $session AND member = $member AND status = 'ACTIVE' LIMIT 1",
            )
            .bind(("session", session))
            .bind(("member", member))
            .await?
            .take(0)?;
        Ok(reservation)
    }

    /// Count active reservations holding seats on a session
    pub async fn count_active_by_session(&self, session: RecordId) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM reservation WHERE session = $session AND status = 'ACTIVE' GROUP ALL",
            )
            .bind(("session", session))
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }

    /// Create an active reservation with the member name snapshotted
    pub async fn create(
        &self,
        session: RecordId,
        member: RecordId,
        member_name: String,
    ) -> RepoResult<Reservation> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE reservation SET
                    session = $session,
                    member = $member,
                    member_name = $member_name,
                    status = 'ACTIVE',
                    reserved_at = $reserved_at,
                    cancelled_at = NONE,
                    attended_at = NONE
                RETURN AFTER"#,
            )
            .bind(("session", session))
            .bind(("member", member))
            .bind(("member_name", member_name))
            .bind(("reserved_at", now_millis()))
            .await?;

        let created: Option<Reservation> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// Cancel an active reservation, freeing its seat
    pub async fn cancel(&self, id: &str) -> RepoResult<Reservation> {
        let reservation = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))?;
        if reservation.status != ReservationStatus::Active {
            return Err(RepoError::Validation(format!(
                "Only active reservations can be cancelled, current status: {:?}",
                reservation.status
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
            .take::<Option<Reservation>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Mark an active reservation as attended
    pub async fn check_in(&self, id: &str) -> RepoResult<Reservation> {
        let reservation = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))?;
        if reservation.status != ReservationStatus::Active {
            return Err(RepoError::Validation(format!(
                "Only active reservations can be checked in, current status: {:?}",
                reservation.status
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
                    status = 'ATTENDED',
                    attended_at = $attended_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("attended_at", now_millis()))
            .await?;

        result
            .take::<Option<Reservation>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Count reservations made in a time window
    pub async fn count_in_range(&self, start: i64, end: i64) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM reservation WHERE reserved_at >= $start AND reserved_at < $end GROUP ALL",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }

    /// Most reserved activities inside [start, end), hottest first
    ///
    /// 取消的预约不计入热度。活动名经由 session 记录链接取快照值。
    pub async fn top_activities(
        &self,
        start: i64,
        end: i64,
        limit: u32,
    ) -> RepoResult<Vec<ActivityCount>> {
        let limit = limit.clamp(1, 50);
        let rows: Vec<ActivityCount> = self
            .base
            .db()
            .query(format!(
                "SELECT (session.activity OR 'unknown') AS activity, count() AS reservations \
                 FROM reservation \
                 WHERE reserved_at >= $start AND reserved_at < $end AND status != 'CANCELLED' \
                 GROUP BY activity ORDER BY reservations DESC LIMIT {}",
                limit
            ))
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(rows)
    }
}

/// 单个活动的预约热度
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ActivityCount {
    pub activity: String,
    pub reservations: u64,
}

#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}
