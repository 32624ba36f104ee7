//! Unified error codes for the I-Card workflow
//!
//! This module defines all error codes used across icard-server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Application errors
//! - 5xxx: I-Card errors
//! - 6xxx: Revocation request errors
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
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,

    // ==================== 4xxx: Application ====================
    /// Application not found (or not assigned to the acting officer)
    ApplicationNotFound = 4001,
    /// Action not permitted from the application's current status
    ApplicationInvalidTransition = 4002,
    /// Another reviewer already moved the application on
    ApplicationAlreadyReviewed = 4003,
    /// Employee already has an application in progress
    ApplicationInProgress = 4004,
    /// Controlling officer required for non-gazetted routing
    ControllingOfficerRequired = 4005,
    /// Remarks are required for every review decision
    RemarksRequired = 4006,

    // ==================== 5xxx: I-Card ====================
    /// I-Card not found
    IcardNotFound = 5001,
    /// I-Card is not active
    IcardNotActive = 5002,
    /// Employee already holds an active I-Card
    IcardAlreadyIssued = 5003,

    // ==================== 6xxx: Revocation ====================
    /// Revocation request not found
    RevocationRequestNotFound = 6001,
    /// Revocation request already decided
    RevocationAlreadyDecided = 6002,

    // ==================== 8xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// HRMS id already registered
    EmployeeHrmsIdExists = 8002,
    /// Employee number already registered
    EmployeeNumberExists = 8003,
    /// Controlling officer not found
    ControllingOfficerNotFound = 8101,
    /// Controlling officer email already registered
    ControllingOfficerEmailExists = 8102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Card sequence allocation failed
    SequenceAllocationFailed = 9101,
    /// Card artifact rendering failed
    ArtifactRenderFailed = 9201,
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

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",

            // Application
            ErrorCode::ApplicationNotFound => "Application not found",
            ErrorCode::ApplicationInvalidTransition => {
                "Action is not allowed in the application's current status"
            }
            ErrorCode::ApplicationAlreadyReviewed => {
                "Application has already been reviewed, please refresh"
            }
            ErrorCode::ApplicationInProgress => "An application is already in progress",
            ErrorCode::ControllingOfficerRequired => {
                "Controlling officer is required for non-gazetted employees"
            }
            ErrorCode::RemarksRequired => "Remarks are required",

            // I-Card
            ErrorCode::IcardNotFound => "I-Card not found",
            ErrorCode::IcardNotActive => "I-Card is not active",
            ErrorCode::IcardAlreadyIssued => "Employee already holds an active I-Card",

            // Revocation
            ErrorCode::RevocationRequestNotFound => "Revocation request not found",
            ErrorCode::RevocationAlreadyDecided => {
                "Revocation request has already been decided, please refresh"
            }

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeHrmsIdExists => "HRMS id already registered",
            ErrorCode::EmployeeNumberExists => "Employee number already registered",
            ErrorCode::ControllingOfficerNotFound => "Controlling officer not found",
            ErrorCode::ControllingOfficerEmailExists => {
                "Controlling officer email already registered"
            }

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::SequenceAllocationFailed => "Card number allocation failed",
            ErrorCode::ArtifactRenderFailed => "Card artifact rendering failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
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
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),

            // Application
            4001 => Ok(ErrorCode::ApplicationNotFound),
            4002 => Ok(ErrorCode::ApplicationInvalidTransition),
            4003 => Ok(ErrorCode::ApplicationAlreadyReviewed),
            4004 => Ok(ErrorCode::ApplicationInProgress),
            4005 => Ok(ErrorCode::ControllingOfficerRequired),
            4006 => Ok(ErrorCode::RemarksRequired),

            // I-Card
            5001 => Ok(ErrorCode::IcardNotFound),
            5002 => Ok(ErrorCode::IcardNotActive),
            5003 => Ok(ErrorCode::IcardAlreadyIssued),

            // Revocation
            6001 => Ok(ErrorCode::RevocationRequestNotFound),
            6002 => Ok(ErrorCode::RevocationAlreadyDecided),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::EmployeeHrmsIdExists),
            8003 => Ok(ErrorCode::EmployeeNumberExists),
            8101 => Ok(ErrorCode::ControllingOfficerNotFound),
            8102 => Ok(ErrorCode::ControllingOfficerEmailExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::SequenceAllocationFailed),
            9201 => Ok(ErrorCode::ArtifactRenderFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::ApplicationAlreadyReviewed.code(), 4003);
        assert_eq!(ErrorCode::IcardNotActive.code(), 5002);
        assert_eq!(ErrorCode::SequenceAllocationFailed.code(), 9101);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }

    #[test]
    fn test_try_from_matches_code() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::ApplicationNotFound,
            ErrorCode::ApplicationInvalidTransition,
            ErrorCode::ApplicationAlreadyReviewed,
            ErrorCode::IcardNotActive,
            ErrorCode::RevocationAlreadyDecided,
            ErrorCode::EmployeeHrmsIdExists,
            ErrorCode::SequenceAllocationFailed,
        ];

        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::ApplicationNotFound).unwrap();
        assert_eq!(json, "4001");

        let json = serde_json::to_string(&ErrorCode::Success).unwrap();
        assert_eq!(json, "0");
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
        assert_eq!(format!("{}", ErrorCode::NotFound), "3");
        assert_eq!(format!("{}", ErrorCode::IcardNotFound), "5001");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
