//! Asset Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Asset, AssetCreate, AssetStatus, AssetUpdate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct AssetRepository {
    base: BaseRepository,
}

impl AssetRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List assets, optionally filtered by status
    pub async fn find_all(&self, status: Option<AssetStatus>) -> RepoResult<Vec<Asset>> {
        let sql = if status.is_some() {
            "SELECT * FROM asset WHERE status = $status ORDER BY name"
        } else {
            "SELECT * FROM asset ORDER BY name"
        };
        let mut query = self.base.db().query(sql);
        if let Some(status) = status {
            query = query.bind(("status", status));
        }
        let assets: Vec<Asset> = query.await?.take(0)?;
        Ok(assets)
    }

    /// Find asset by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Asset>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let asset: Option<Asset> = self.base.db().select(thing).await?;
        Ok(asset)
    }

    /// Create a new asset in operational status
    pub async fn create(&self, data: AssetCreate) -> RepoResult<Asset> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE asset SET
                    name = $name,
                    category = $category,
                    space = $space,
                    serial_number = $serial_number,
                    purchased_at = $purchased_at,
                    status = 'OPERATIONAL',
                    note = $note,
                    created_at = $created_at,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("category", data.category))
            .bind(("space", data.space))
            .bind(("serial_number", data.serial_number))
            .bind(("purchased_at", data.purchased_at))
            .bind(("note", data.note))
            .bind(("created_at", now))
            .bind(("updated_at", now))
            .await?;

        let created: Option<Asset> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create asset".to_string()))
    }

    /// Update an asset's descriptive fields
    pub async fn update(&self, id: &str, data: AssetUpdate) -> RepoResult<Asset> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Asset {} not found", id)))?;
        if existing.status == AssetStatus::Retired {
            return Err(RepoError::Validation(
                "Retired assets cannot be modified".to_string(),
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
                    name = $name OR name,
                    category = $category OR category,
                    space = IF $has_space THEN $space ELSE space END,
                    serial_number = IF $has_serial_number THEN $serial_number ELSE serial_number END,
                    purchased_at = IF $has_purchased_at THEN $purchased_at ELSE purchased_at END,
                    note = IF $has_note THEN $note ELSE note END,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("category", data.category))
            .bind(("has_space", data.space.is_some()))
            .bind(("space", data.space))
            .bind(("has_serial_number", data.serial_number.is_some()))
            .bind(("serial_number", data.serial_number))
            .bind(("has_purchased_at", data.purchased_at.is_some()))
            .bind(("purchased_at", data.purchased_at))
            .bind(("has_note", data.note.is_some()))
            .bind(("note", data.note))
            .bind(("updated_at", now_millis()))
            .await?;

        result
            .take::<Option<Asset>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Asset {} not found", id)))
    }

    /// Move an asset between operational and maintenance status
    ///
    /// RETIRED is terminal; use retire() to get there and nothing leaves it.
    pub async fn set_status(&self, id: &str, status: AssetStatus) -> RepoResult<Asset> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Asset {} not found", id)))?;
        if existing.status == AssetStatus::Retired {
            return Err(RepoError::Validation(
                "Retired assets cannot change status".to_string(),
            ));
        }
        if status == AssetStatus::Retired {
            return Err(RepoError::Validation(
                "Use the retire operation to retire an asset".to_string(),
            ));
        }

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status, updated_at = $updated_at RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("updated_at", now_millis()))
            .await?;

        result
            .take::<Option<Asset>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Asset {} not found", id)))
    }

    /// Retire an asset
    ///
    /// Fails while a maintenance record on it is still open.
    pub async fn retire(&self, id: &str) -> RepoResult<Asset> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Asset {} not found", id)))?;
        if existing.status == AssetStatus::Retired {
            return Err(RepoError::Validation(
                "Asset is already retired".to_string(),
            ));
        }

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM maintenance_record WHERE asset = $asset AND status IN ['OPEN', 'IN_PROGRESS'] GROUP ALL",
            )
            .bind(("asset", thing.clone()))
            .await?;
        let open: Option<CountResult> = result.take(0)?;
        if open.map(|c| c.total).unwrap_or(0) > 0 {
            return Err(RepoError::Validation(
                "Asset has open maintenance records".to_string(),
            ));
        }

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = 'RETIRED', updated_at = $updated_at RETURN AFTER")
            .bind(("thing", thing))
            .bind(("updated_at", now_millis()))
            .await?;

        result
            .take::<Option<Asset>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Asset {} not found", id)))
    }

    /// Count assets currently in maintenance
    pub async fn count_in_maintenance(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM asset WHERE status = 'IN_MAINTENANCE' GROUP ALL",
            )
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }
}

#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}
