//! Error taxonomy for graph operations.
//!
//! Four kinds, all synchronous and recoverable: scalar validation, missing
//! capability, graph constraint violation, and stale/unknown handles. A failed
//! operation never leaves a half-linked graph behind.

use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HospitalError>;

/// Top-level error for every fallible graph operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HospitalError {
    /// Blank, negative or out-of-range scalar input; the entity is unchanged.
    #[error("validation: {0}")]
    Validation(String),

    /// A role-gated field or operation was used without the owning capability.
    #[error("capability: {0}")]
    Capability(String),

    /// The operation is individually valid but would break a graph invariant.
    #[error("constraint: {0}")]
    Constraint(#[from] ConstraintViolation),

    /// A handle that does not (or no longer does) resolve in its registry.
    #[error("no registered {kind} under that handle")]
    NotFound { kind: &'static str },
}

/// The multiplicity and exclusivity rules checked before any link commits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintViolation {
    #[error("person is already employed by a department; detach first")]
    AlreadyEmployed,

    #[error("employee id {0} is already taken in this department")]
    EmployeeIdTaken(String),

    #[error("doctor already has an appointment at {0}")]
    DoubleBooking(DateTime<Utc>),

    #[error("patient already has an active room admission")]
    ActiveAdmission,

    #[error("patient has an active surgery")]
    ActiveSurgery,

    #[error("nurse is already assisting another appointment")]
    NurseOccupied,

    #[error("a doctor cannot supervise themselves")]
    SelfSupervision,

    #[error("doctor already has a supervisor; clear the current one first")]
    SupervisorAlreadySet,

    #[error("head candidate is not an employee of this department")]
    HeadNotEmployee,

    #[error("department head must be a permanent doctor")]
    HeadNotPermanent,

    #[error("doctor already heads another department")]
    AlreadyHeadsDepartment,

    #[error("room is full")]
    RoomFull,

    #[error("room is out of service")]
    RoomOutOfService,

    #[error("address is attached to another person")]
    AddressInUse,

    #[error("appointment is already completed")]
    AlreadyCompleted,

    #[error("room assignment is already discharged")]
    AlreadyDischarged,
}

impl HospitalError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        HospitalError::Validation(message.into())
    }

    pub(crate) fn capability(message: impl Into<String>) -> Self {
        HospitalError::Capability(message.into())
    }

    /// True for the constraint-violation kind of the taxonomy.
    pub fn is_constraint(&self) -> bool {
        matches!(self, HospitalError::Constraint(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violations_convert_and_classify() {
        let err: HospitalError = ConstraintViolation::ActiveAdmission.into();
        assert!(err.is_constraint());
        assert!(!HospitalError::validation("x").is_constraint());
    }

    #[test]
    fn messages_name_the_rule() {
        let err = HospitalError::from(ConstraintViolation::NurseOccupied);
        assert!(err.to_string().contains("assisting"));
    }
}
