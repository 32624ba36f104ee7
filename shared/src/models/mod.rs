//! Data models
//!
//! Records of the I-Card workflow. Database derives (`sqlx::FromRow`,
//! `sqlx::Type`) are enabled with the `db` feature.

pub mod application;
pub mod controlling_officer;
pub mod employee;
pub mod icard;
pub mod icard_request;

pub use application::{
    Application, ApplicationCreate, ApplicationStatus, ReviewAction, ReviewDecision, ReviewStage,
    rejection_stage,
};
pub use controlling_officer::{ControllingOfficer, ControllingOfficerCreate};
pub use employee::{Employee, EmployeeCategory, EmployeeCreate, EmployeeStatus, EmployeeUpdate};
pub use icard::{Icard, IcardCreate, IcardStatus};
pub use icard_request::{IcardRequest, RequestStatus, RequestType, RevocationCreate};
