//! Database Module
//!
//! Handles the embedded SurrealDB instance, schema definition and seeding

pub mod models;
pub mod repository;

use crate::auth::permissions::get_default_permissions;
use crate::db::models::Employee;
use crate::utils::AppError;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// 系统内置角色，启动时补齐
const SYSTEM_ROLES: [&str; 5] = ["admin", "manager", "receptionist", "coach", "cleaner"];

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the embedded database, apply schema and seed system records
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("hierro")
            .use_db("club")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database connection established (SurrealDB RocksDB, ns=hierro db=club)");

        let service = Self { db };
        service.define_schema().await?;
        service.seed_roles().await?;
        service.seed_admin().await?;

        Ok(service)
    }

    /// Unique indexes the business rules depend on
    ///
    /// DEFINE 语句幂等，启动时重复执行无副作用。
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                r#"
                DEFINE INDEX IF NOT EXISTS employee_username ON TABLE employee FIELDS username UNIQUE;
                DEFINE INDEX IF NOT EXISTS role_name ON TABLE role FIELDS name UNIQUE;
                DEFINE INDEX IF NOT EXISTS member_card_code ON TABLE member FIELDS card_code UNIQUE;
                DEFINE INDEX IF NOT EXISTS session_template_date ON TABLE class_session FIELDS template, date UNIQUE;
                DEFINE INDEX IF NOT EXISTS sale_receipt ON TABLE sale FIELDS receipt_number UNIQUE;
                DEFINE INDEX IF NOT EXISTS audit_sequence ON TABLE audit_log FIELDS sequence UNIQUE;
                DEFINE INDEX IF NOT EXISTS access_event_time ON TABLE access_event FIELDS timestamp;
                "#,
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database schema applied");
        Ok(())
    }

    /// Create any missing system role with its default permission set
    async fn seed_roles(&self) -> Result<(), AppError> {
        for name in SYSTEM_ROLES {
            let existing: Option<models::Role> = self
                .db
                .query("SELECT * FROM role WHERE name = $name LIMIT 1")
                .bind(("name", name.to_string()))
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .take(0)
                .map_err(|e| AppError::database(e.to_string()))?;

            if existing.is_none() {
                let permissions = get_default_permissions(name);
                self.db
                    .query(
                        r#"CREATE role SET
                            name = $name,
                            permissions = $permissions,
                            is_system = true,
                            is_active = true"#,
                    )
                    .bind(("name", name.to_string()))
                    .bind(("permissions", permissions))
                    .await
                    .map_err(|e| AppError::database(e.to_string()))?;
                tracing::info!("Seeded system role '{}'", name);
            }
        }
        Ok(())
    }

    /// Create the system admin account on first boot
    async fn seed_admin(&self) -> Result<(), AppError> {
        let existing: Option<Employee> = self
            .db
            .query("SELECT * FROM employee WHERE username = 'admin' LIMIT 1")
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .take(0)
            .map_err(|e| AppError::database(e.to_string()))?;

        if existing.is_some() {
            return Ok(());
        }

        let admin_role: Option<models::Role> = self
            .db
            .query("SELECT * FROM role WHERE name = 'admin' LIMIT 1")
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .take(0)
            .map_err(|e| AppError::database(e.to_string()))?;
        let admin_role = admin_role
            .and_then(|r| r.id)
            .ok_or_else(|| AppError::database("admin role missing after seeding"))?;

        let password = match std::env::var("HIERRO_ADMIN_PASSWORD") {
            Ok(p) if !p.is_empty() => p,
            _ => {
                tracing::warn!(
                    "HIERRO_ADMIN_PASSWORD not set, seeding admin with default password; change it immediately"
                );
                "admin".to_string()
            }
        };
        let hash = Employee::hash_password(&password)
            .map_err(|e| AppError::database(format!("Failed to hash admin password: {e}")))?;

        self.db
            .query(
                r#"CREATE employee SET
                    username = 'admin',
                    display_name = 'Administrator',
                    hash_pass = $hash,
                    role = $role,
                    specialization = NONE,
                    shift = NONE,
                    phone = NONE,
                    email = NONE,
                    is_system = true,
                    is_active = true,
                    created_at = $created_at"#,
            )
            .bind(("hash", hash))
            .bind(("role", admin_role))
            .bind(("created_at", now_millis()))
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        tracing::info!("Seeded system admin account");
        Ok(())
    }
}
