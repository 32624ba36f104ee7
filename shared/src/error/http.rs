//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::ApplicationNotFound
            | Self::IcardNotFound
            | Self::RevocationRequestNotFound
            | Self::EmployeeNotFound
            | Self::ControllingOfficerNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (refresh and retry with the current state)
            Self::AlreadyExists
            | Self::ApplicationAlreadyReviewed
            | Self::ApplicationInProgress
            | Self::IcardAlreadyIssued
            | Self::RevocationAlreadyDecided
            | Self::EmployeeHrmsIdExists
            | Self::EmployeeNumberExists
            | Self::ControllingOfficerEmailExists => StatusCode::CONFLICT,

            // 422 Unprocessable (state does not allow the action)
            Self::ApplicationInvalidTransition | Self::IcardNotActive => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::RoleRequired => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::SequenceAllocationFailed
            | Self::ArtifactRenderFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
