//! Schedule Template Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ScheduleTemplate, ScheduleTemplateCreate, ScheduleTemplateUpdate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ScheduleTemplateRepository {
    base: BaseRepository,
}

impl ScheduleTemplateRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all templates, inactive included
    pub async fn find_all(&self) -> RepoResult<Vec<ScheduleTemplate>> {
        let templates: Vec<ScheduleTemplate> = self
            .base
            .db()
            .query("SELECT * FROM schedule_template ORDER BY weekday, start_time")
            .await?
            .take(0)?;
        Ok(templates)
    }

    /// Find active templates only
    pub async fn find_active(&self) -> RepoResult<Vec<ScheduleTemplate>> {
        let templates: Vec<ScheduleTemplate> = self
            .base
            .db()
            .query(
                "SELECT * FROM schedule_template WHERE is_active = true ORDER BY weekday, start_time",
            )
            .await?
            .take(0)?;
        Ok(templates)
    }

    /// Find template by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ScheduleTemplate>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let template: Option<ScheduleTemplate> = self.base.db().select(thing).await?;
        Ok(template)
    }

    /// Create a new template
    pub async fn create(&self, data: ScheduleTemplateCreate) -> RepoResult<ScheduleTemplate> {
        let space: Option<crate::db::models::Space> =
            self.base.db().select(data.space.clone()).await?;
        if space.is_none() {
            return Err(RepoError::NotFound(format!(
                "Space {} not found",
                data.space
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE schedule_template SET
                    activity = $activity,
                    space = $space,
                    coach = $coach,
                    weekday = $weekday,
                    start_time = $start_time,
                    end_time = $end_time,
                    capacity = $capacity,
                    valid_from = $valid_from,
                    valid_until = $valid_until,
                    is_active = true,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("activity", data.activity))
            .bind(("space", data.space))
            .bind(("coach", data.coach))
            .bind(("weekday", data.weekday))
            .bind(("start_time", data.start_time))
            .bind(("end_time", data.end_time))
            .bind(("capacity", data.capacity))
            .bind(("valid_from", data.valid_from))
            .bind(("valid_until", data.valid_until))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<ScheduleTemplate> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create schedule template".to_string()))
    }

    /// Update a template
    ///
    /// Changes never touch sessions that were already generated; those
    /// carry their own snapshot of activity, space and times.
    pub async fn update(
        &self,
        id: &str,
        data: ScheduleTemplateUpdate,
    ) -> RepoResult<ScheduleTemplate> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    activity = $activity OR activity,
                    coach = IF $has_coach THEN $coach ELSE coach END,
                    weekday = IF $has_weekday THEN $weekday ELSE weekday END,
                    start_time = $start_time OR start_time,
                    end_time = $end_time OR end_time,
                    capacity = IF $has_capacity THEN $capacity ELSE capacity END,
                    valid_from = $valid_from OR valid_from,
                    valid_until = $valid_until OR valid_until,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("activity", data.activity))
            .bind(("has_coach", data.coach.is_some()))
            .bind(("coach", data.coach))
            .bind(("has_weekday", data.weekday.is_some()))
            .bind(("weekday", data.weekday))
            .bind(("start_time", data.start_time))
            .bind(("end_time", data.end_time))
            .bind(("has_capacity", data.capacity.is_some()))
            .bind(("capacity", data.capacity))
            .bind(("valid_from", data.valid_from))
            .bind(("valid_until", data.valid_until))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .await?;

        result
            .take::<Option<ScheduleTemplate>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Schedule template {} not found", id)))
    }

    /// Hard delete a template
    ///
    /// Generated sessions survive; they reference the template only for
    /// idempotence and keep their own snapshot data.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!(
                "Schedule template {} not found",
                id
            )));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
