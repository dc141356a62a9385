//! Space Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Space, SpaceCreate, SpaceUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct SpaceRepository {
    base: BaseRepository,
}

impl SpaceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all spaces
    pub async fn find_all(&self) -> RepoResult<Vec<Space>> {
        let spaces: Vec<Space> = self
            .base
            .db()
            .query("SELECT * FROM space ORDER BY name")
            .await?
            .take(0)?;
        Ok(spaces)
    }

    /// Find spaces belonging to a site
    pub async fn find_by_site(&self, site: RecordId) -> RepoResult<Vec<Space>> {
        let spaces: Vec<Space> = self
            .base
            .db()
            .query("SELECT * FROM space WHERE site = $site ORDER BY name")
            .bind(("site", site))
            .await?
            .take(0)?;
        Ok(spaces)
    }

    /// Find space by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Space>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let space: Option<Space> = self.base.db().select(thing).await?;
        Ok(space)
    }

    /// Create a new space
    pub async fn create(&self, data: SpaceCreate) -> RepoResult<Space> {
        // Site must exist
        let site: Option<crate::db::models::Site> =
            self.base.db().select(data.site.clone()).await?;
        if site.is_none() {
            return Err(RepoError::NotFound(format!(
                "Site {} not found",
                data.site
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE space SET
                    site = $site,
                    name = $name,
                    kind = $kind,
                    capacity = $capacity,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("site", data.site))
            .bind(("name", data.name))
            .bind(("kind", data.kind))
            .bind(("capacity", data.capacity))
            .await?;

        let created: Option<Space> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create space".to_string()))
    }

    /// Update a space
    pub async fn update(&self, id: &str, data: SpaceUpdate) -> RepoResult<Space> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    kind = IF $has_kind THEN $kind ELSE kind END,
                    capacity = IF $has_capacity THEN $capacity ELSE capacity END,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("has_kind", data.kind.is_some()))
            .bind(("kind", data.kind))
            .bind(("has_capacity", data.capacity.is_some()))
            .bind(("capacity", data.capacity))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .await?;

        result
            .take::<Option<Space>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Space {} not found", id)))
    }

    /// Hard delete a space
    ///
    /// Fails while schedule templates still reference it.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Space {} not found", id)));
        }

        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM schedule_template WHERE space = $space GROUP ALL")
            .bind(("space", thing.clone()))
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        if count.map(|c| c.total).unwrap_or(0) > 0 {
            return Err(RepoError::Validation(
                "Space is still used by schedule templates".to_string(),
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

#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}
