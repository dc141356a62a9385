//! Site Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Site, SiteCreate, SiteUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct SiteRepository {
    base: BaseRepository,
}

impl SiteRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all sites
    pub async fn find_all(&self) -> RepoResult<Vec<Site>> {
        let sites: Vec<Site> = self
            .base
            .db()
            .query("SELECT * FROM site ORDER BY name")
            .await?
            .take(0)?;
        Ok(sites)
    }

    /// Find site by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Site>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let site: Option<Site> = self.base.db().select(thing).await?;
        Ok(site)
    }

    /// Create a new site
    pub async fn create(&self, data: SiteCreate) -> RepoResult<Site> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE site SET
                    name = $name,
                    address = $address,
                    phone = $phone,
                    opening_hours = $opening_hours,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("address", data.address))
            .bind(("phone", data.phone))
            .bind(("opening_hours", data.opening_hours))
            .await?;

        let created: Option<Site> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create site".to_string()))
    }

    /// Update a site
    pub async fn update(&self, id: &str, data: SiteUpdate) -> RepoResult<Site> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    address = IF $has_address THEN $address ELSE address END,
                    phone = IF $has_phone THEN $phone ELSE phone END,
                    opening_hours = IF $has_opening_hours THEN $opening_hours ELSE opening_hours END,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("has_address", data.address.is_some()))
            .bind(("address", data.address))
            .bind(("has_phone", data.phone.is_some()))
            .bind(("phone", data.phone))
            .bind(("has_opening_hours", data.opening_hours.is_some()))
            .bind(("opening_hours", data.opening_hours))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .await?;

        result
            .take::<Option<Site>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Site {} not found", id)))
    }

    /// Hard delete a site
    ///
    /// Fails while spaces still reference it.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Site {} not found", id)));
        }

        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM space WHERE site = $site GROUP ALL")
            .bind(("site", thing.clone()))
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        if count.map(|c| c.total).unwrap_or(0) > 0 {
            return Err(RepoError::Validation(
                "Site still has spaces".to_string(),
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
