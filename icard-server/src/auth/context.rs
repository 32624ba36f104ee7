//! 调用者上下文
//!
//! Every workflow operation receives an explicit [`AuthContext`] instead of
//! reading ambient session state.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reviewer / actor role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    ControllingOfficer,
    Dealer,
    Awo,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::ControllingOfficer => "controlling_officer",
            Self::Dealer => "dealer",
            Self::Awo => "awo",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Self::Employee),
            "controlling_officer" | "co" => Ok(Self::ControllingOfficer),
            "dealer" => Ok(Self::Dealer),
            "awo" => Ok(Self::Awo),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Authenticated caller
///
/// - `principal_id`: hrms_id for employees, login email for officers and staff
/// - `officer_id`: resolved controlling officer row, set only for [`Role::ControllingOfficer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub principal_id: String,
    pub role: Role,
    pub officer_id: Option<i64>,
}

impl AuthContext {
    pub fn new(principal_id: impl Into<String>, role: Role) -> Self {
        Self {
            principal_id: principal_id.into(),
            role,
            officer_id: None,
        }
    }

    /// Controlling officer context bound to an officer row
    pub fn controlling_officer(email: impl Into<String>, officer_id: i64) -> Self {
        Self {
            principal_id: email.into(),
            role: Role::ControllingOfficer,
            officer_id: Some(officer_id),
        }
    }

    pub fn current_role(&self) -> Role {
        self.role
    }

    pub fn current_principal_id(&self) -> &str {
        &self.principal_id
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("AWO".parse::<Role>().unwrap(), Role::Awo);
        assert_eq!("co".parse::<Role>().unwrap(), Role::ControllingOfficer);
        assert_eq!(
            "controlling_officer".parse::<Role>().unwrap(),
            Role::ControllingOfficer
        );
        assert!("cashier".parse::<Role>().is_err());
    }

    #[test]
    fn test_context_roles() {
        let ctx = AuthContext::controlling_officer("co@example.org", 7);
        assert_eq!(ctx.current_role(), Role::ControllingOfficer);
        assert_eq!(ctx.current_principal_id(), "co@example.org");
        assert_eq!(ctx.officer_id, Some(7));
        assert!(ctx.has_any_role(&[Role::Dealer, Role::ControllingOfficer]));
        assert!(!AuthContext::new("E100", Role::Employee).has_any_role(&[Role::Awo]));
    }
}
