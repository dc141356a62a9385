//! Unified error codes for the club platform
//!
//! This module defines all error codes used across the server and frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Member errors
//! - 4xxx: Schedule errors
//! - 5xxx: Reservation errors
//! - 6xxx: Facility errors
//! - 7xxx: Billing errors
//! - 8xxx: Employee errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// Account is locked (too many login attempts)
    AccountLocked = 1006,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Cannot modify admin user
    CannotModifyAdmin = 2004,
    /// Cannot delete admin user
    CannotDeleteAdmin = 2005,

    // ==================== 3xxx: Member ====================
    /// Member not found
    MemberNotFound = 3001,
    /// Member card code already exists
    MemberCardExists = 3002,
    /// Member is inactive
    MemberInactive = 3003,
    /// Member has subscriptions
    MemberHasSubscriptions = 3004,

    // ==================== 4xxx: Schedule ====================
    /// Schedule template not found
    ScheduleNotFound = 4001,
    /// Schedule template is inactive
    ScheduleInactive = 4002,
    /// Schedule end time is not after start time
    ScheduleTimeInvalid = 4003,
    /// Schedule validity window is inverted
    ScheduleWindowInvalid = 4004,
    /// Generation window is inverted
    GenerationWindowInvalid = 4005,
    /// Class session not found
    SessionNotFound = 4101,
    /// Class session has been cancelled
    SessionCancelled = 4102,
    /// Class session has already been completed
    SessionAlreadyCompleted = 4103,
    /// Site not found
    SiteNotFound = 4201,
    /// Site has associated spaces
    SiteHasSpaces = 4202,
    /// Space not found
    SpaceNotFound = 4301,
    /// Space is in use by schedules or assets
    SpaceInUse = 4302,

    // ==================== 5xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 5001,
    /// Class session is full
    SessionFull = 5002,
    /// Member already has a reservation for this session
    AlreadyReserved = 5003,
    /// Reservation has already been cancelled
    ReservationAlreadyCancelled = 5004,
    /// Class session is not open for reservations
    SessionNotReservable = 5005,
    /// Reservation has already been checked in
    ReservationAlreadyAttended = 5006,

    // ==================== 6xxx: Facility ====================
    /// Asset not found
    AssetNotFound = 6001,
    /// Asset has been retired
    AssetRetired = 6002,
    /// Asset is already under maintenance
    AssetInMaintenance = 6003,
    /// Maintenance record not found
    MaintenanceNotFound = 6101,
    /// Maintenance record is already closed
    MaintenanceAlreadyClosed = 6102,
    /// Invalid maintenance status transition
    MaintenanceInvalidTransition = 6103,
    /// Cleaning task not found
    CleaningTaskNotFound = 6201,
    /// Cleaning task has assignments
    CleaningTaskInUse = 6202,
    /// Cleaning assignment not found
    CleaningAssignmentNotFound = 6301,
    /// Cleaning assignment is already done
    CleaningAlreadyDone = 6302,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// No filename provided
    NoFilename = 6506,
    /// Invalid file extension
    InvalidFileExtension = 6507,
    /// Image processing failed
    ImageProcessingFailed = 6508,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 7xxx: Billing ====================
    /// Sale not found
    SaleNotFound = 7001,
    /// Sale has no line items
    SaleEmpty = 7002,
    /// Sale amount is invalid
    SaleInvalidAmount = 7003,
    /// Invalid payment method
    PaymentInvalidMethod = 7004,
    /// Subscription not found
    SubscriptionNotFound = 7101,
    /// Subscription is not active
    SubscriptionNotActive = 7102,
    /// Subscription overlaps an existing active one
    SubscriptionOverlaps = 7103,
    /// Subscription end date is not after start date
    SubscriptionDateInvalid = 7104,

    // ==================== 8xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Employee username already exists
    EmployeeUsernameExists = 8002,
    /// Cannot delete self
    EmployeeCannotDeleteSelf = 8003,
    /// Cannot modify/delete system employee
    EmployeeIsSystem = 8004,
    /// Employee is inactive
    EmployeeInactive = 8005,
    /// Role not found
    RoleNotFound = 8101,
    /// Role name already exists
    RoleNameExists = 8102,
    /// Role is in use
    RoleInUse = 8103,
    /// Cannot modify/delete system role
    RoleIsSystem = 8104,
    /// Unknown permission string
    PermissionUnknown = 8105,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,

    // ==================== 94xx: Storage ====================
    /// Storage full (disk space insufficient)
    StorageFull = 9401,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9402,
    /// System busy (IO error, retry later)
    SystemBusy = 9403,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::AccountLocked => "Account is locked",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::CannotModifyAdmin => "Cannot modify administrator user",
            ErrorCode::CannotDeleteAdmin => "Cannot delete administrator user",

            // Member
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::MemberCardExists => "Member card code already exists",
            ErrorCode::MemberInactive => "Member is inactive",
            ErrorCode::MemberHasSubscriptions => "Member has associated subscriptions",

            // Schedule
            ErrorCode::ScheduleNotFound => "Schedule template not found",
            ErrorCode::ScheduleInactive => "Schedule template is inactive",
            ErrorCode::ScheduleTimeInvalid => "End time must be after start time",
            ErrorCode::ScheduleWindowInvalid => "Validity window is inverted",
            ErrorCode::GenerationWindowInvalid => "Generation window is inverted",
            ErrorCode::SessionNotFound => "Class session not found",
            ErrorCode::SessionCancelled => "Class session has been cancelled",
            ErrorCode::SessionAlreadyCompleted => "Class session has already been completed",
            ErrorCode::SiteNotFound => "Site not found",
            ErrorCode::SiteHasSpaces => "Site has associated spaces",
            ErrorCode::SpaceNotFound => "Space not found",
            ErrorCode::SpaceInUse => "Space is in use",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::SessionFull => "Class session is full",
            ErrorCode::AlreadyReserved => "Member already has a reservation for this session",
            ErrorCode::ReservationAlreadyCancelled => "Reservation has already been cancelled",
            ErrorCode::SessionNotReservable => "Class session is not open for reservations",
            ErrorCode::ReservationAlreadyAttended => "Reservation has already been checked in",

            // Facility
            ErrorCode::AssetNotFound => "Asset not found",
            ErrorCode::AssetRetired => "Asset has been retired",
            ErrorCode::AssetInMaintenance => "Asset is already under maintenance",
            ErrorCode::MaintenanceNotFound => "Maintenance record not found",
            ErrorCode::MaintenanceAlreadyClosed => "Maintenance record is already closed",
            ErrorCode::MaintenanceInvalidTransition => "Invalid maintenance status transition",
            ErrorCode::CleaningTaskNotFound => "Cleaning task not found",
            ErrorCode::CleaningTaskInUse => "Cleaning task has assignments",
            ErrorCode::CleaningAssignmentNotFound => "Cleaning assignment not found",
            ErrorCode::CleaningAlreadyDone => "Cleaning assignment is already done",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::InvalidFileExtension => "Invalid file extension",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // Billing
            ErrorCode::SaleNotFound => "Sale not found",
            ErrorCode::SaleEmpty => "Sale has no line items",
            ErrorCode::SaleInvalidAmount => "Sale amount is invalid",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::SubscriptionNotFound => "Subscription not found",
            ErrorCode::SubscriptionNotActive => "Subscription is not active",
            ErrorCode::SubscriptionOverlaps => "Subscription overlaps an existing active one",
            ErrorCode::SubscriptionDateInvalid => "End date must be after start date",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeUsernameExists => "Employee username already exists",
            ErrorCode::EmployeeCannotDeleteSelf => "Cannot delete own account",
            ErrorCode::EmployeeIsSystem => "Cannot modify system employee",
            ErrorCode::EmployeeInactive => "Employee is inactive",
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::RoleNameExists => "Role name already exists",
            ErrorCode::RoleInUse => "Role is currently in use",
            ErrorCode::RoleIsSystem => "Cannot modify system role",
            ErrorCode::PermissionUnknown => "Unknown permission",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",

            // Storage
            ErrorCode::StorageFull => "Storage full (disk space insufficient)",
            ErrorCode::StorageCorrupted => "Storage corrupted (data file damaged)",
            ErrorCode::SystemBusy => "System busy, please retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::AccountLocked),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::CannotModifyAdmin),
            2005 => Ok(ErrorCode::CannotDeleteAdmin),

            // Member
            3001 => Ok(ErrorCode::MemberNotFound),
            3002 => Ok(ErrorCode::MemberCardExists),
            3003 => Ok(ErrorCode::MemberInactive),
            3004 => Ok(ErrorCode::MemberHasSubscriptions),

            // Schedule
            4001 => Ok(ErrorCode::ScheduleNotFound),
            4002 => Ok(ErrorCode::ScheduleInactive),
            4003 => Ok(ErrorCode::ScheduleTimeInvalid),
            4004 => Ok(ErrorCode::ScheduleWindowInvalid),
            4005 => Ok(ErrorCode::GenerationWindowInvalid),
            4101 => Ok(ErrorCode::SessionNotFound),
            4102 => Ok(ErrorCode::SessionCancelled),
            4103 => Ok(ErrorCode::SessionAlreadyCompleted),
            4201 => Ok(ErrorCode::SiteNotFound),
            4202 => Ok(ErrorCode::SiteHasSpaces),
            4301 => Ok(ErrorCode::SpaceNotFound),
            4302 => Ok(ErrorCode::SpaceInUse),

            // Reservation
            5001 => Ok(ErrorCode::ReservationNotFound),
            5002 => Ok(ErrorCode::SessionFull),
            5003 => Ok(ErrorCode::AlreadyReserved),
            5004 => Ok(ErrorCode::ReservationAlreadyCancelled),
            5005 => Ok(ErrorCode::SessionNotReservable),
            5006 => Ok(ErrorCode::ReservationAlreadyAttended),

            // Facility
            6001 => Ok(ErrorCode::AssetNotFound),
            6002 => Ok(ErrorCode::AssetRetired),
            6003 => Ok(ErrorCode::AssetInMaintenance),
            6101 => Ok(ErrorCode::MaintenanceNotFound),
            6102 => Ok(ErrorCode::MaintenanceAlreadyClosed),
            6103 => Ok(ErrorCode::MaintenanceInvalidTransition),
            6201 => Ok(ErrorCode::CleaningTaskNotFound),
            6202 => Ok(ErrorCode::CleaningTaskInUse),
            6301 => Ok(ErrorCode::CleaningAssignmentNotFound),
            6302 => Ok(ErrorCode::CleaningAlreadyDone),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::NoFilename),
            6507 => Ok(ErrorCode::InvalidFileExtension),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // Billing
            7001 => Ok(ErrorCode::SaleNotFound),
            7002 => Ok(ErrorCode::SaleEmpty),
            7003 => Ok(ErrorCode::SaleInvalidAmount),
            7004 => Ok(ErrorCode::PaymentInvalidMethod),
            7101 => Ok(ErrorCode::SubscriptionNotFound),
            7102 => Ok(ErrorCode::SubscriptionNotActive),
            7103 => Ok(ErrorCode::SubscriptionOverlaps),
            7104 => Ok(ErrorCode::SubscriptionDateInvalid),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::EmployeeUsernameExists),
            8003 => Ok(ErrorCode::EmployeeCannotDeleteSelf),
            8004 => Ok(ErrorCode::EmployeeIsSystem),
            8005 => Ok(ErrorCode::EmployeeInactive),
            8101 => Ok(ErrorCode::RoleNotFound),
            8102 => Ok(ErrorCode::RoleNameExists),
            8103 => Ok(ErrorCode::RoleInUse),
            8104 => Ok(ErrorCode::RoleIsSystem),
            8105 => Ok(ErrorCode::PermissionUnknown),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            // Storage
            9401 => Ok(ErrorCode::StorageFull),
            9402 => Ok(ErrorCode::StorageCorrupted),
            9403 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::Unknown.code(), 1);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);

        // Auth
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::TokenExpired.code(), 1003);
        assert_eq!(ErrorCode::TokenInvalid.code(), 1004);
        assert_eq!(ErrorCode::AccountLocked.code(), 1006);

        // Permission
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);

        // Member
        assert_eq!(ErrorCode::MemberNotFound.code(), 3001);
        assert_eq!(ErrorCode::MemberCardExists.code(), 3002);
        assert_eq!(ErrorCode::MemberInactive.code(), 3003);

        // Schedule
        assert_eq!(ErrorCode::ScheduleNotFound.code(), 4001);
        assert_eq!(ErrorCode::SessionNotFound.code(), 4101);
        assert_eq!(ErrorCode::SiteNotFound.code(), 4201);
        assert_eq!(ErrorCode::SpaceNotFound.code(), 4301);

        // Reservation
        assert_eq!(ErrorCode::ReservationNotFound.code(), 5001);
        assert_eq!(ErrorCode::SessionFull.code(), 5002);
        assert_eq!(ErrorCode::AlreadyReserved.code(), 5003);

        // Facility
        assert_eq!(ErrorCode::AssetNotFound.code(), 6001);
        assert_eq!(ErrorCode::MaintenanceNotFound.code(), 6101);
        assert_eq!(ErrorCode::CleaningTaskNotFound.code(), 6201);
        assert_eq!(ErrorCode::FileTooLarge.code(), 6501);

        // Billing
        assert_eq!(ErrorCode::SaleNotFound.code(), 7001);
        assert_eq!(ErrorCode::SubscriptionNotFound.code(), 7101);
        assert_eq!(ErrorCode::SubscriptionOverlaps.code(), 7103);

        // Employee
        assert_eq!(ErrorCode::EmployeeNotFound.code(), 8001);
        assert_eq!(ErrorCode::EmployeeUsernameExists.code(), 8002);
        assert_eq!(ErrorCode::RoleNotFound.code(), 8101);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::StorageFull.code(), 9401);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::NotFound.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(3001), Ok(ErrorCode::MemberNotFound));
        assert_eq!(ErrorCode::try_from(4101), Ok(ErrorCode::SessionNotFound));
        assert_eq!(ErrorCode::try_from(5002), Ok(ErrorCode::SessionFull));
        assert_eq!(ErrorCode::try_from(7101), Ok(ErrorCode::SubscriptionNotFound));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_from_error_code_to_u16() {
        let code: u16 = ErrorCode::Success.into();
        assert_eq!(code, 0);

        let code: u16 = ErrorCode::NotAuthenticated.into();
        assert_eq!(code, 1001);

        let code: u16 = ErrorCode::InternalError.into();
        assert_eq!(code, 9001);
    }

    #[test]
    fn test_serialize() {
        let code = ErrorCode::NotFound;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "3");

        let code = ErrorCode::SessionFull;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "5002");

        let code = ErrorCode::Success;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("0").unwrap();
        assert_eq!(code, ErrorCode::Success);

        let code: ErrorCode = serde_json::from_str("3").unwrap();
        assert_eq!(code, ErrorCode::NotFound);

        let code: ErrorCode = serde_json::from_str("5002").unwrap();
        assert_eq!(code, ErrorCode::SessionFull);

        let code: ErrorCode = serde_json::from_str("9001").unwrap();
        assert_eq!(code, ErrorCode::InternalError);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::NotFound), "3");
        assert_eq!(format!("{}", ErrorCode::SessionFull), "5002");
        assert_eq!(format!("{}", ErrorCode::InternalError), "9001");
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ErrorCode::Success.message(),
            "Operation completed successfully"
        );
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::SessionFull.message(), "Class session is full");
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::MemberNotFound,
            ErrorCode::SessionFull,
            ErrorCode::SubscriptionOverlaps,
            ErrorCode::InternalError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }

    #[test]
    fn test_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(ErrorCode::Success);
        set.insert(ErrorCode::NotFound);
        set.insert(ErrorCode::Success); // Duplicate

        assert_eq!(set.len(), 2);
        assert!(set.contains(&ErrorCode::Success));
        assert!(set.contains(&ErrorCode::NotFound));
    }
}
