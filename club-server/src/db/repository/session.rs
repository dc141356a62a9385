//! Class Session Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ClassSession, SessionStatus};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Snapshot data for a freshly generated session.
///
/// Everything a member sees about a class is copied from the template at
/// generation time so later template edits leave history untouched.
#[derive(Debug, Clone)]
pub struct SessionInsert {
    pub template: RecordId,
    pub date: String,
    pub activity: String,
    pub space: RecordId,
    pub space_name: String,
    pub coach: Option<RecordId>,
    pub coach_name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub capacity: u32,
}

#[derive(Clone)]
pub struct ClassSessionRepository {
    base: BaseRepository,
}

impl ClassSessionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List sessions within a date range, newest day last
    pub async fn find_in_range(
        &self,
        from: &str,
        to: &str,
        template: Option<RecordId>,
        space: Option<RecordId>,
        activity: Option<String>,
    ) -> RepoResult<Vec<ClassSession>> {
        let mut conditions = vec!["date >= $from", "date <= $to"];
        if template.is_some() {
            conditions.push("template = $template");
        }
        if space.is_some() {
            conditions.push("space = $space");
        }
        if activity.is_some() {
            conditions.push("string::lowercase(activity) CONTAINS string::lowercase($activity)");
        }
        let sql = format!(
            "SELECT * FROM class_session WHERE {} ORDER BY date, start_time",
            conditions.join(" AND ")
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("from", from.to_string()))
            .bind(("to", to.to_string()));
        if let Some(template) = template {
            query = query.bind(("template", template));
        }
        if let Some(space) = space {
            query = query.bind(("space", space));
        }
        if let Some(activity) = activity {
            query = query.bind(("activity", activity));
        }

        let sessions: Vec<ClassSession> = query.await?.take(0)?;
        Ok(sessions)
    }

    /// Find session by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ClassSession>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let session: Option<ClassSession> = self.base.db().select(thing).await?;
        Ok(session)
    }

    /// Look up the session a template already generated for a date
    pub async fn find_by_template_and_date(
        &self,
        template: RecordId,
        date: &str,
    ) -> RepoResult<Option<ClassSession>> {
        let session: Option<ClassSession> = self
            .base
            .db()
            .query("SELECT * FROM class_session WHERE template = $template AND date = $date LIMIT 1")
            .bind(("template", template))
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(session)
    }

    /// Insert a generated session
    ///
    /// The (template, date) unique index backs this up: a concurrent
    /// generation run loses the race and gets a database error, which the
    /// generation service counts as already existing.
    pub async fn create(&self, data: SessionInsert) -> RepoResult<ClassSession> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE class_session SET
                    template = $template,
                    date = $date,
                    activity = $activity,
                    space = $space,
                    space_name = $space_name,
                    coach = $coach,
                    coach_name = $coach_name,
                    start_time = $start_time,
                    end_time = $end_time,
                    capacity = $capacity,
                    status = 'SCHEDULED',
                    cancellation_reason = NONE,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("template", data.template))
            .bind(("date", data.date))
            .bind(("activity", data.activity))
            .bind(("space", data.space))
            .bind(("space_name", data.space_name))
            .bind(("coach", data.coach))
            .bind(("coach_name", data.coach_name))
            .bind(("start_time", data.start_time))
            .bind(("end_time", data.end_time))
            .bind(("capacity", data.capacity))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<ClassSession> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create class session".to_string()))
    }

    /// Cancel a scheduled session
    pub async fn cancel(&self, id: &str, reason: Option<String>) -> RepoResult<ClassSession> {
        let session = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Session {} not found", id)))?;
        if session.status != SessionStatus::Scheduled {
            return Err(RepoError::Validation(format!(
                "Only scheduled sessions can be cancelled, current status: {:?}",
                session.status
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
                    cancellation_reason = $reason
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("reason", reason))
            .await?;

        result
            .take::<Option<ClassSession>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Session {} not found", id)))
    }

    /// Mark a scheduled session completed
    pub async fn complete(&self, id: &str) -> RepoResult<ClassSession> {
        let session = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Session {} not found", id)))?;
        if session.status != SessionStatus::Scheduled {
            return Err(RepoError::Validation(format!(
                "Only scheduled sessions can be completed, current status: {:?}",
                session.status
            )));
        }

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = 'COMPLETED' RETURN AFTER")
            .bind(("thing", thing))
            .await?;

        result
            .take::<Option<ClassSession>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Session {} not found", id)))
    }

    /// Count scheduled sessions on a given date
    pub async fn count_on_date(&self, date: &str) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM class_session WHERE date = $date AND status = 'SCHEDULED' GROUP ALL",
            )
            .bind(("date", date.to_string()))
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }
}

#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}
