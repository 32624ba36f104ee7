//! Card number allocation
//!
//! Gazetted: `<gazetted prefix>` + 4 digits, non-gazetted: `<non-gazetted prefix>` + 5 digits.
//! Values are never reused; a rolled-back issuance returns its value with the rollback.

use shared::models::EmployeeCategory;
use sqlx::SqliteConnection;

use super::{WorkflowError, WorkflowResult};
use crate::db::repository::sequence;

/// Display prefixes per category
#[derive(Debug, Clone)]
pub struct SequenceAllocator {
    gazetted_prefix: String,
    non_gazetted_prefix: String,
}

impl SequenceAllocator {
    pub fn new(gazetted_prefix: impl Into<String>, non_gazetted_prefix: impl Into<String>) -> Self {
        Self {
            gazetted_prefix: gazetted_prefix.into(),
            non_gazetted_prefix: non_gazetted_prefix.into(),
        }
    }

    pub fn prefix(&self, category: EmployeeCategory) -> &str {
        match category {
            EmployeeCategory::Gazetted => &self.gazetted_prefix,
            EmployeeCategory::NonGazetted => &self.non_gazetted_prefix,
        }
    }

    /// Allocate the next card number for `category`.
    ///
    /// Must run on the issuing transaction's connection so the counter advance
    /// commits or rolls back with the I-Card row.
    pub async fn next_card_number(
        &self,
        conn: &mut SqliteConnection,
        category: EmployeeCategory,
    ) -> WorkflowResult<String> {
        let counter = category.sequence_prefix();
        let value = sequence::allocate(&mut *conn, counter)
            .await
            .map_err(|e| WorkflowError::AllocationFailed(format!("counter {counter}: {e}")))?
            .ok_or_else(|| WorkflowError::AllocationFailed(format!("No sequence counter row for {counter}")))?;

        Ok(format_card_number(
            self.prefix(category),
            value,
            category.card_number_width(),
        ))
    }
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self::new("GAZ", "NG")
    }
}

/// `prefix` followed by `value` zero-padded to `width` digits (wider values are kept whole)
pub fn format_card_number(prefix: &str, value: i64, width: usize) -> String {
    format!("{prefix}{value:0width$}")
}
