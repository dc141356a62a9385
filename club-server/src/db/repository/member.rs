//! Member Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Member, MemberCreate, MemberStatus, MemberUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct MemberRepository {
    base: BaseRepository,
}

impl MemberRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List members with optional name/card search and status filter, newest first
    pub async fn search(
        &self,
        query: Option<String>,
        status: Option<MemberStatus>,
        limit: u32,
        offset: u32,
    ) -> RepoResult<(Vec<Member>, u64)> {
        let mut conditions = Vec::new();
        if query.is_some() {
            conditions.push(
                "(string::lowercase(first_name) CONTAINS $q \
                 OR string::lowercase(last_name) CONTAINS $q \
                 OR string::lowercase(card_code) CONTAINS $q \
                 OR (email != NONE AND string::lowercase(email) CONTAINS $q) \
                 OR (phone != NONE AND phone CONTAINS $q))",
            );
        }
        if status.is_some() {
            conditions.push("status = $status");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT count() AS total FROM member{where_clause} GROUP ALL; \
             SELECT * FROM member{where_clause} ORDER BY joined_at DESC LIMIT {limit} START {offset}"
        );

        let mut qb = self.base.db().query(&sql);
        if let Some(q) = query {
            qb = qb.bind(("q", q.to_lowercase()));
        }
        if let Some(status) = status {
            qb = qb.bind(("status", status));
        }

        let mut result = qb.await?;
        let count: Option<CountResult> = result.take(0)?;
        let members: Vec<Member> = result.take(1)?;
        Ok((members, count.map(|c| c.total).unwrap_or(0)))
    }

    /// Find member by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Member>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let member: Option<Member> = self.base.db().select(thing).await?;
        Ok(member)
    }

    /// Find member by card code
    pub async fn find_by_card_code(&self, card_code: &str) -> RepoResult<Option<Member>> {
        let code = card_code.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM member WHERE card_code = $card_code LIMIT 1")
            .bind(("card_code", code))
            .await?;
        let members: Vec<Member> = result.take(0)?;
        Ok(members.into_iter().next())
    }

    /// Create a new member
    pub async fn create(&self, data: MemberCreate) -> RepoResult<Member> {
        let card_code = match data.card_code.filter(|c| !c.trim().is_empty()) {
            Some(code) => {
                if self.find_by_card_code(&code).await?.is_some() {
                    return Err(RepoError::Duplicate(format!(
                        "Card code '{}' already exists",
                        code
                    )));
                }
                code
            }
            None => self.generate_card_code().await?,
        };

        let now = shared::util::now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE member SET
                    card_code = $card_code,
                    first_name = $first_name,
                    last_name = $last_name,
                    email = $email,
                    phone = $phone,
                    birth_date = $birth_date,
                    photo_url = $photo_url,
                    note = $note,
                    status = 'ACTIVE',
                    joined_at = $now,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("card_code", card_code))
            .bind(("first_name", data.first_name))
            .bind(("last_name", data.last_name))
            .bind(("email", data.email))
            .bind(("phone", data.phone))
            .bind(("birth_date", data.birth_date))
            .bind(("photo_url", data.photo_url))
            .bind(("note", data.note))
            .bind(("now", now))
            .await?;

        let created: Option<Member> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create member".to_string()))
    }

    /// Generate an unused 10-digit card code
    ///
    /// 碰撞概率极低，循环只是兜底；唯一索引仍是最终防线。
    async fn generate_card_code(&self) -> RepoResult<String> {
        use rand::Rng;
        for _ in 0..5 {
            let code = format!("{:010}", rand::thread_rng().gen_range(0u64..10_000_000_000));
            if self.find_by_card_code(&code).await?.is_none() {
                return Ok(code);
            }
        }
        Err(RepoError::Database(
            "Failed to generate a unique card code".to_string(),
        ))
    }

    /// Update a member
    pub async fn update(&self, id: &str, data: MemberUpdate) -> RepoResult<Member> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Member {} not found", id)))?;

        if let Some(ref new_code) = data.card_code
            && new_code != &existing.card_code
            && self.find_by_card_code(new_code).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Card code '{}' already exists",
                new_code
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    card_code = $card_code OR card_code,
                    first_name = $first_name OR first_name,
                    last_name = $last_name OR last_name,
                    email = IF $has_email THEN $email ELSE email END,
                    phone = IF $has_phone THEN $phone ELSE phone END,
                    birth_date = IF $has_birth_date THEN $birth_date ELSE birth_date END,
                    photo_url = IF $has_photo_url THEN $photo_url ELSE photo_url END,
                    note = IF $has_note THEN $note ELSE note END,
                    status = IF $has_status THEN $status ELSE status END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("card_code", data.card_code))
            .bind(("first_name", data.first_name))
            .bind(("last_name", data.last_name))
            .bind(("has_email", data.email.is_some()))
            .bind(("email", data.email))
            .bind(("has_phone", data.phone.is_some()))
            .bind(("phone", data.phone))
            .bind(("has_birth_date", data.birth_date.is_some()))
            .bind(("birth_date", data.birth_date))
            .bind(("has_photo_url", data.photo_url.is_some()))
            .bind(("photo_url", data.photo_url))
            .bind(("has_note", data.note.is_some()))
            .bind(("note", data.note))
            .bind(("has_status", data.status.is_some()))
            .bind(("status", data.status))
            .bind(("now", shared::util::now_millis()))
            .await?;

        result
            .take::<Option<Member>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Member {} not found", id)))
    }

    /// Soft delete — 会员带着门禁/销售历史，永不硬删
    pub async fn deactivate(&self, id: &str) -> RepoResult<Member> {
        self.update(
            id,
            MemberUpdate {
                card_code: None,
                first_name: None,
                last_name: None,
                email: None,
                phone: None,
                birth_date: None,
                photo_url: None,
                note: None,
                status: Some(MemberStatus::Inactive),
            },
        )
        .await
    }

    /// Count members by status
    pub async fn count_by_status(&self, status: MemberStatus) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM member WHERE status = $status GROUP ALL")
            .bind(("status", status))
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }

    /// Count all members
    pub async fn count_all(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM member GROUP ALL")
            .await?;
        let count: Option<CountResult> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }
}

#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}
