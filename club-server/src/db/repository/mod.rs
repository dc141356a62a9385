//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Auth
pub mod employee;
pub mod role;

// Members & access
pub mod access;
pub mod member;
pub mod subscription;

// Facilities
pub mod asset;
pub mod cleaning;
pub mod maintenance;
pub mod site;
pub mod space;

// Scheduling
pub mod reservation;
pub mod schedule;
pub mod session;

// Point of sale
pub mod sale;

// Re-exports
pub use access::AccessEventRepository;
pub use asset::AssetRepository;
pub use cleaning::{CleaningAssignmentRepository, CleaningTaskRepository};
pub use employee::EmployeeRepository;
pub use maintenance::MaintenanceRepository;
pub use member::MemberRepository;
pub use reservation::ReservationRepository;
pub use role::RoleRepository;
pub use sale::SaleRepository;
pub use schedule::ScheduleTemplateRepository;
pub use session::ClassSessionRepository;
pub use site::SiteRepository;
pub use space::SpaceRepository;
pub use subscription::SubscriptionRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use shared::error::{AppError, ErrorCode};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Common repository trait for basic CRUD
#[allow(async_fn_in_trait)]
pub trait Repository<T, CreateDto, UpdateDto> {
    async fn find_all(&self) -> RepoResult<Vec<T>>;
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<T>>;
    async fn create(&self, data: CreateDto) -> RepoResult<T>;
    async fn update(&self, id: &str, data: UpdateDto) -> RepoResult<T>;
    async fn delete(&self, id: &str) -> RepoResult<bool>;
}

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "member:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("member", "abc");
//   - 获取表名: id.table()
//   - 获取纯ID: id.key().to_string()
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
