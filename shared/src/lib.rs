//! Shared types for the Hierro club platform
//!
//! Common types used by the club server and its clients: unified error
//! codes, response structures, auth DTOs, and small utilities.

pub mod client;
pub mod error;
pub mod response;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use response::{PaginatedResponse, Pagination};
