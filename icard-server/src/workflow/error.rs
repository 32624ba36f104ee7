use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Workflow errors
///
/// Business variants carry the [`ErrorCode`] reported to clients.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{1}")]
    NotFound(ErrorCode, String),

    /// The record is not in a state that admits this action
    #[error("{1}")]
    InvalidTransition(ErrorCode, String),

    /// The guarded update lost a race: the record moved on since it was read
    #[error("{1}")]
    AlreadyReviewed(ErrorCode, String),

    #[error("{1}")]
    ValidationFailed(ErrorCode, String),

    #[error("Card number allocation failed: {0}")]
    AllocationFailed(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl WorkflowError {
    /// Only a lost race is worth retrying after re-reading the record
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AlreadyReviewed(..))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(code, _)
            | Self::InvalidTransition(code, _)
            | Self::AlreadyReviewed(code, _)
            | Self::ValidationFailed(code, _) => *code,
            Self::AllocationFailed(_) => ErrorCode::SequenceAllocationFailed,
            Self::PersistenceFailed(_) => ErrorCode::DatabaseError,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
        }
    }
}

impl From<RepoError> for WorkflowError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => WorkflowError::NotFound(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => WorkflowError::InvalidTransition(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => WorkflowError::ValidationFailed(ErrorCode::ValidationFailed, msg),
            RepoError::Database(msg) => WorkflowError::PersistenceFailed(msg),
        }
    }
}

impl From<sqlx::Error> for WorkflowError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::from(err).into()
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        let code = err.code();
        match &err {
            WorkflowError::AllocationFailed(_) | WorkflowError::PersistenceFailed(_) => {
                tracing::error!(error = %err, error_code = ?code, "Workflow storage error");
            }
            WorkflowError::AlreadyReviewed(..) => {
                tracing::warn!(error = %err, "Concurrent review conflict");
            }
            _ => {}
        }
        let retryable = err.is_retryable();
        let app_error = AppError::with_message(code, err.to_string());
        if retryable {
            app_error.with_detail("retryable", true)
        } else {
            app_error
        }
    }
}

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
