//! Employee Model (员工档案)

use serde::{Deserialize, Serialize};

/// Employee category: decides whether CO review is part of the chain.
///
/// Immutable after creation: in-flight applications were routed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum EmployeeCategory {
    Gazetted,
    NonGazetted,
}

impl EmployeeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gazetted => "gazetted",
            Self::NonGazetted => "non_gazetted",
        }
    }

    /// Key of the sequence counter row used for this category's card numbers
    pub fn sequence_prefix(&self) -> &'static str {
        match self {
            Self::Gazetted => "GAZ",
            Self::NonGazetted => "NG",
        }
    }

    /// Zero-padded width of the numeric part of a card number
    pub fn card_number_width(&self) -> usize {
        match self {
            Self::Gazetted => 4,
            Self::NonGazetted => 5,
        }
    }

    /// Non-gazetted applications go through the controlling officer first
    pub fn requires_co_review(&self) -> bool {
        matches!(self, Self::NonGazetted)
    }
}

impl std::fmt::Display for EmployeeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employee record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

/// Employee entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    /// HRMS identity key (unique, immutable)
    pub hrms_id: String,
    pub name: String,
    /// Employee number (unique)
    pub emp_number: String,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: String,
    pub category: EmployeeCategory,
    pub department_id: Option<i64>,
    pub status: EmployeeStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

/// Create employee payload (Dealer / Admin manual entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub hrms_id: String,
    pub name: String,
    pub emp_number: String,
    pub date_of_birth: String,
    pub category: EmployeeCategory,
    pub department_id: Option<i64>,
}

/// Update employee payload
///
/// Category is intentionally absent: it cannot change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub department_id: Option<i64>,
    pub status: Option<EmployeeStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_routing_and_numbering() {
        assert!(EmployeeCategory::NonGazetted.requires_co_review());
        assert!(!EmployeeCategory::Gazetted.requires_co_review());

        assert_eq!(EmployeeCategory::Gazetted.sequence_prefix(), "GAZ");
        assert_eq!(EmployeeCategory::NonGazetted.sequence_prefix(), "NG");
        assert_eq!(EmployeeCategory::Gazetted.card_number_width(), 4);
        assert_eq!(EmployeeCategory::NonGazetted.card_number_width(), 5);
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&EmployeeCategory::NonGazetted).unwrap();
        assert_eq!(json, "\"non_gazetted\"");

        let category: EmployeeCategory = serde_json::from_str("\"gazetted\"").unwrap();
        assert_eq!(category, EmployeeCategory::Gazetted);
    }
}
