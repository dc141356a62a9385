//! Maintenance Record Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MaintenanceClose, MaintenanceKind, MaintenanceRecord, MaintenanceStatus};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct MaintenanceRepository {
    base: BaseRepository,
}

impl MaintenanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List maintenance records, optionally filtered by asset and status
    pub async fn find_all(
        &self,
        asset: Option<RecordId>,
        status: Option<MaintenanceStatus>,
    ) -> RepoResult<Vec<MaintenanceRecord>> {
        let mut conditions: Vec<&str> = Vec::new();
        if asset.is_some() {
            conditions.push("asset = $asset");
        }
        if status.is_some() {
            conditions.push("status = $status");
        }
        let sql = if conditions.is_empty() {
            "SELECT * FROM maintenance_record ORDER BY opened_at DESC".to_string()
        } else {
            format!(
                "SELECT * FROM maintenance_record WHERE {} ORDER BY opened_at DESC",
                conditions.join(" AND ")
            )
        };

        let mut query = self.base.db().query(sql);
        if let Some(asset) = asset {
            query = query.bind(("asset", asset));
        }
        if let Some(status) = status {
            query = query.bind(("status", status));
        }

        let records: Vec<MaintenanceRecord> = query.await?.take(0)?;
        Ok(records)
    }

    /// Find record by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MaintenanceRecord>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let record: Option<MaintenanceRecord> = self.base.db().select(thing).await?;
        Ok(record)
    }

    /// Open a maintenance record with the asset name snapshotted
    pub async fn create(
        &self,
        asset: RecordId,
        asset_name: String,
        kind: MaintenanceKind,
        description: String,
        reported_by: Option<RecordId>,
        reported_by_name: Option<String>,
    ) -> RepoResult<MaintenanceRecord> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE maintenance_record SET
                    asset = $asset,
                    asset_name = $asset_name,
                    kind = $kind,
                    description = $description,
                    status = 'OPEN',
                    reported_by = $reported_by,
                    reported_by_name = $reported_by_name,
                    opened_at = $opened_at,
                    started_at = NONE,
                    closed_at = NONE,
                    resolution = NONE,
                    technician = NONE,
                    cost = NONE
                RETURN AFTER"#,
            )
            .bind(("asset", asset))
            .bind(("asset_name", asset_name))
            .bind(("kind", kind))
            .bind(("description", description))
            .bind(("reported_by", reported_by))
            .bind(("reported_by_name", reported_by_name))
            .bind(("opened_at", now_millis()))
            .await?;

        let created: Option<MaintenanceRecord> = result.take(0)?;
        created.ok_or_else(|| {
            RepoError::Database("Failed to create maintenance record".to_string())
        })
    }

    /// Move an open record to in-progress
    pub async fn start(&self, id: &str) -> RepoResult<MaintenanceRecord> {
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Maintenance record {} not found", id)))?;
        if record.status != MaintenanceStatus::Open {
            return Err(RepoError::Validation(format!(
                "Only open records can be started, current status: {:?}",
                record.status
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
                    status = 'IN_PROGRESS',
                    started_at = $started_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("started_at", now_millis()))
            .await?;

        result
            .take::<Option<MaintenanceRecord>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Maintenance record {} not found", id)))
    }

    /// Close a record with an optional resolution and cost
    ///
    /// Open records may be closed directly without passing through
    /// in-progress.
    pub async fn close(&self, id: &str, data: MaintenanceClose) -> RepoResult<MaintenanceRecord> {
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Maintenance record {} not found", id)))?;
        if !record.status.is_open() {
            return Err(RepoError::Validation(format!(
                "Maintenance record is already {:?}",
                record.status
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
                    status = 'CLOSED',
                    closed_at = $closed_at,
                    resolution = $resolution,
                    technician = $technician,
                    cost = $cost
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("closed_at", now_millis()))
            .bind(("resolution", data.resolution))
            .bind(("technician", data.technician))
            .bind(("cost", data.cost))
            .await?;

        result
            .take::<Option<MaintenanceRecord>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Maintenance record {} not found", id)))
    }

    /// Abandon a work order (wrong report, duplicate)
    pub async fn cancel(&self, id: &str) -> RepoResult<MaintenanceRecord> {
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Maintenance record {} not found", id)))?;
        if !record.status.is_open() {
            return Err(RepoError::Validation(format!(
                "Maintenance record is already {:?}",
                record.status
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
                    closed_at = $closed_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("closed_at", now_millis()))
            .await?;

        result
            .take::<Option<MaintenanceRecord>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Maintenance record {} not found", id)))
    }

    /// Count records that are still pending
    pub async fn count_open(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM maintenance_record WHERE status IN ['OPEN', 'IN_PROGRESS'] GROUP ALL",
            )
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }

    /// Count pending work orders for one asset
    ///
    /// 用于判断关单后器材是否可以回到 OPERATIONAL。
    pub async fn count_open_for_asset(&self, asset: RecordId) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM maintenance_record \
                 WHERE asset = $asset AND status IN ['OPEN', 'IN_PROGRESS'] GROUP ALL",
            )
            .bind(("asset", asset))
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }
}

#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}
