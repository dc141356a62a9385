//! Employee Model

use super::RoleId;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Employee ID type
pub type EmployeeId = RecordId;

/// Employee model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<EmployeeId>,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    #[serde(with = "serde_helpers::record_id")]
    pub role: RoleId,
    /// 教练专长 (仅 coach 角色使用，如 "crossfit", "spinning")
    pub specialization: Option<String>,
    /// 排班时段 (清洁/前台角色使用，如 "mañana", "tarde")
    pub shift: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_system: bool,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
    #[serde(with = "serde_helpers::record_id")]
    pub role: RoleId,
    pub specialization: Option<String>,
    pub shift: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub role: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Employee {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = Employee::hash_password("s3cret-pass").unwrap();
        let employee = Employee {
            id: None,
            username: "ana".into(),
            display_name: "Ana".into(),
            hash_pass: hash,
            role: "role:receptionist".parse().unwrap(),
            specialization: None,
            shift: None,
            phone: None,
            email: None,
            is_system: false,
            is_active: true,
            created_at: None,
        };
        assert!(employee.verify_password("s3cret-pass").unwrap());
        assert!(!employee.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_hash_pass_not_serialized() {
        let employee = Employee {
            id: None,
            username: "ana".into(),
            display_name: "Ana".into(),
            hash_pass: "secret-hash".into(),
            role: "role:admin".parse().unwrap(),
            specialization: None,
            shift: None,
            phone: None,
            email: None,
            is_system: false,
            is_active: true,
            created_at: None,
        };
        let json = serde_json::to_string(&employee).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
