//! Cleaning Repositories
//!
//! 任务定义与每日排班分两张表。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    CleaningAssignment, CleaningStatus, CleaningTask, CleaningTaskCreate, CleaningTaskUpdate,
};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct CleaningTaskRepository {
    base: BaseRepository,
}

impl CleaningTaskRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all tasks, inactive included
    pub async fn find_all(&self) -> RepoResult<Vec<CleaningTask>> {
        let tasks: Vec<CleaningTask> = self
            .base
            .db()
            .query("SELECT * FROM cleaning_task ORDER BY name")
            .await?
            .take(0)?;
        Ok(tasks)
    }

    /// Find task by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<CleaningTask>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let task: Option<CleaningTask> = self.base.db().select(thing).await?;
        Ok(task)
    }

    /// Create a new cleaning task
    pub async fn create(&self, data: CleaningTaskCreate) -> RepoResult<CleaningTask> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE cleaning_task SET
                    name = $name,
                    description = $description,
                    space = $space,
                    frequency = $frequency,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("space", data.space))
            .bind(("frequency", data.frequency))
            .await?;

        let created: Option<CleaningTask> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create cleaning task".to_string()))
    }

    /// Update a cleaning task
    pub async fn update(&self, id: &str, data: CleaningTaskUpdate) -> RepoResult<CleaningTask> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    description = IF $has_description THEN $description ELSE description END,
                    space = IF $has_space THEN $space ELSE space END,
                    frequency = IF $has_frequency THEN $frequency ELSE frequency END,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("has_description", data.description.is_some()))
            .bind(("description", data.description))
            .bind(("has_space", data.space.is_some()))
            .bind(("space", data.space))
            .bind(("has_frequency", data.frequency.is_some()))
            .bind(("frequency", data.frequency))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .await?;

        result
            .take::<Option<CleaningTask>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Cleaning task {} not found", id)))
    }

    /// Delete a task definition. Refused while any assignment references it,
    /// done ones included; deactivate instead to retire a task.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!(
                "Cleaning task {} not found",
                id
            )));
        }

        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM cleaning_assignment WHERE task = $task GROUP ALL")
            .bind(("task", thing.clone()))
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        if count.map(|c| c.total).unwrap_or(0) > 0 {
            return Err(RepoError::Validation(
                "Cleaning task still has assignments".to_string(),
            ));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}

#[derive(Clone)]
pub struct CleaningAssignmentRepository {
    base: BaseRepository,
}

impl CleaningAssignmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Assignments on a date, optionally for one employee
    pub async fn find_by_date(
        &self,
        date: &str,
        employee: Option<RecordId>,
    ) -> RepoResult<Vec<CleaningAssignment>> {
        let sql = if employee.is_some() {
            "SELECT * FROM cleaning_assignment WHERE date = $date AND employee = $employee ORDER BY task_name"
        } else {
            "SELECT * FROM cleaning_assignment WHERE date = $date ORDER BY task_name"
        };
        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("date", date.to_string()));
        if let Some(employee) = employee {
            query = query.bind(("employee", employee));
        }
        let assignments: Vec<CleaningAssignment> = query.await?.take(0)?;
        Ok(assignments)
    }

    /// Find assignment by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<CleaningAssignment>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let assignment: Option<CleaningAssignment> = self.base.db().select(thing).await?;
        Ok(assignment)
    }

    /// The same task already assigned to the employee on the date, if any
    pub async fn find_duplicate(
        &self,
        task: RecordId,
        employee: RecordId,
        date: &str,
    ) -> RepoResult<Option<CleaningAssignment>> {
        let assignment: Option<CleaningAssignment> = self
            .base
            .db()
            .query(
                "SELECT * FROM cleaning_assignment WHERE task = $task AND employee = $employee AND date = $date LIMIT 1",
            )
            .bind(("task", task))
            .bind(("employee", employee))
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(assignment)
    }

    /// Create a pending assignment with name snapshots
    pub async fn create(
        &self,
        task: RecordId,
        task_name: String,
        employee: RecordId,
        employee_name: String,
        date: String,
        note: Option<String>,
    ) -> RepoResult<CleaningAssignment> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE cleaning_assignment SET
                    task = $task,
                    task_name = $task_name,
                    employee = $employee,
                    employee_name = $employee_name,
                    date = $date,
                    status = 'PENDING',
                    completed_at = NONE,
                    note = $note
                RETURN AFTER"#,
            )
            .bind(("task", task))
            .bind(("task_name", task_name))
            .bind(("employee", employee))
            .bind(("employee_name", employee_name))
            .bind(("date", date))
            .bind(("note", note))
            .await?;

        let created: Option<CleaningAssignment> = result.take(0)?;
        created
            .ok_or_else(|| RepoError::Database("Failed to create cleaning assignment".to_string()))
    }

    /// Mark a pending assignment done
    pub async fn mark_done(
        &self,
        id: &str,
        note: Option<String>,
    ) -> RepoResult<CleaningAssignment> {
        let assignment = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Cleaning assignment {} not found", id)))?;
        if assignment.status != CleaningStatus::Pending {
            return Err(RepoError::Validation(
                "Cleaning assignment is already done".to_string(),
            ));
        }

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    status = 'DONE',
                    completed_at = $completed_at,
                    note = IF $has_note THEN $note ELSE note END
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("completed_at", now_millis()))
            .bind(("has_note", note.is_some()))
            .bind(("note", note))
            .await?;

        result
            .take::<Option<CleaningAssignment>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Cleaning assignment {} not found", id)))
    }

    /// Delete a pending assignment
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let assignment = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Cleaning assignment {} not found", id)))?;
        if assignment.status != CleaningStatus::Pending {
            return Err(RepoError::Validation(
                "Completed assignments cannot be deleted".to_string(),
            ));
        }

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// Count assignments still pending on one date
    pub async fn count_pending_on(&self, date: &str) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM cleaning_assignment \
                 WHERE date = $date AND status = 'PENDING' GROUP ALL",
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
