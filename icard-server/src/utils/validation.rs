//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::ErrorCode;

use crate::utils::AppError;
use crate::workflow::WorkflowError;

// ── Text length limits ──────────────────────────────────────────────

/// Names: employee, officer, designation
pub const MAX_NAME_LEN: usize = 200;

/// Reviewer remarks, revocation reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: hrms_id, emp_number, mobile number, blood group
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Document references (photo / signature)
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        ));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        let len = v.chars().count();
        if len > max_len {
            return Err(AppError::validation(format!(
                "{field} is too long ({len} chars, max {max_len})"
            )));
        }
    }
    Ok(())
}

/// Reviewer remarks at the HTTP boundary: a minimum length applies on top of
/// the non-empty rule enforced by the workflow.
pub fn validate_remarks_len(value: &str, min_len: usize) -> Result<(), AppError> {
    let len = value.trim().chars().count();
    if len < min_len {
        return Err(AppError::with_message(
            ErrorCode::RemarksRequired,
            format!("Remarks must be at least {min_len} characters"),
        )
        .with_detail("min_len", min_len));
    }
    let len = value.chars().count();
    if len > MAX_NOTE_LEN {
        return Err(AppError::validation(format!(
            "Remarks are too long ({len} chars, max {MAX_NOTE_LEN})"
        )));
    }
    Ok(())
}

// ── Validation helpers (Workflow actions) ───────────────────────────

/// Validate a required string for workflow actions (non-empty + max length).
pub fn validate_workflow_text(
    value: &str,
    field: &str,
    code: ErrorCode,
    max_len: usize,
) -> Result<(), WorkflowError> {
    if value.trim().is_empty() {
        return Err(WorkflowError::ValidationFailed(
            code,
            format!("{field} must not be empty"),
        ));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(WorkflowError::ValidationFailed(
            ErrorCode::ValidationFailed,
            format!("{field} is too long ({len} chars, max {max_len})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("E100", "hrms_id", MAX_SHORT_TEXT_LEN).is_ok());
        let err = validate_required_text("   ", "hrms_id", MAX_SHORT_TEXT_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let long = "x".repeat(MAX_SHORT_TEXT_LEN + 1);
        let err = validate_required_text(&long, "hrms_id", MAX_SHORT_TEXT_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_remarks_min_len() {
        assert!(validate_remarks_len("Verified", 5).is_ok());
        let err = validate_remarks_len(" ok  ", 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::RemarksRequired);
        // Zero minimum still defers the empty check to the workflow
        assert!(validate_remarks_len("", 0).is_ok());
    }

    #[test]
    fn test_workflow_text() {
        let err = validate_workflow_text("", "Remarks", ErrorCode::RemarksRequired, MAX_NOTE_LEN)
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::ValidationFailed(ErrorCode::RemarksRequired, _)
        ));
        assert!(validate_workflow_text("Looks fine", "Remarks", ErrorCode::RemarksRequired, MAX_NOTE_LEN).is_ok());
    }

    #[test]
    fn test_limits_count_characters() {
        // 2 bytes per char in UTF-8
        let at_limit = "é".repeat(MAX_NAME_LEN);
        assert!(validate_workflow_text(&at_limit, "Reason", ErrorCode::RequiredField, MAX_NAME_LEN).is_ok());
        assert!(validate_required_text(&at_limit, "Name", MAX_NAME_LEN).is_ok());
        assert!(validate_optional_text(&Some(at_limit), "Name", MAX_NAME_LEN).is_ok());
        assert!(validate_remarks_len(&"é".repeat(MAX_NOTE_LEN), 5).is_ok());

        let over = "é".repeat(MAX_NAME_LEN + 1);
        let err = validate_required_text(&over, "Name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains(&format!("{} chars", MAX_NAME_LEN + 1)));
    }
}
