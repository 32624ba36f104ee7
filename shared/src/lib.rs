//! Shared types for the I-Card workflow
//!
//! Common types used by the server and its clients: data models,
//! the unified error system and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
