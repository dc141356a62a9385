//! Database Models

// Serde helpers
pub mod serde_helpers;

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
pub use access::{AccessDenyReason, AccessEvent, AccessEventId};
pub use asset::{Asset, AssetCreate, AssetId, AssetStatus, AssetUpdate};
pub use cleaning::{
    CleaningAssignment, CleaningAssignmentCreate, CleaningAssignmentId, CleaningStatus,
    CleaningTask, CleaningTaskCreate, CleaningTaskId, CleaningTaskUpdate,
};
pub use employee::{Employee, EmployeeCreate, EmployeeId, EmployeeUpdate};
pub use maintenance::{
    MaintenanceClose, MaintenanceCreate, MaintenanceKind, MaintenanceRecord, MaintenanceRecordId,
    MaintenanceStatus,
};
pub use member::{Member, MemberCreate, MemberId, MemberStatus, MemberUpdate};
pub use reservation::{Reservation, ReservationCreate, ReservationId, ReservationStatus};
pub use role::{Role, RoleCreate, RoleId, RoleUpdate};
pub use sale::{PaymentMethod, Sale, SaleCreate, SaleId, SaleLine, SaleLineCreate};
pub use schedule::{
    ScheduleTemplate, ScheduleTemplateCreate, ScheduleTemplateId, ScheduleTemplateUpdate,
    chrono_weekday,
};
pub use session::{ClassSession, ClassSessionId, SessionStatus};
pub use site::{Site, SiteCreate, SiteId, SiteUpdate};
pub use space::{Space, SpaceCreate, SpaceId, SpaceUpdate};
pub use subscription::{
    Subscription, SubscriptionCreate, SubscriptionId, SubscriptionRenew, SubscriptionStatus,
};
