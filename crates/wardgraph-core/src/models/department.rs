//! Departments, their rooms, and room assignments.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_text;
use crate::error::{HospitalError, Result};
use crate::ids::{DepartmentId, PersonId, RoomAssignmentId, RoomId};

/// A hospital department. Employees are a qualified association keyed by
/// national ID; rooms are owned outright (composition).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Department {
    id: DepartmentId,
    uid: Uuid,
    name: String,
    location: String,
    pub(crate) employees: BTreeMap<String, PersonId>,
    pub(crate) rooms: Vec<RoomId>,
    pub(crate) head: Option<PersonId>,
    pub(crate) total_employees: u32,
}

impl Department {
    pub(crate) fn new(id: DepartmentId, uid: Uuid, name: String, location: String) -> Self {
        Self {
            id,
            uid,
            name,
            location,
            employees: BTreeMap::new(),
            rooms: Vec::new(),
            head: None,
            total_employees: 0,
        }
    }

    pub fn id(&self) -> DepartmentId {
        self.id
    }

    /// Globally unique identifier minted at registration.
    pub fn uid(&self) -> Uuid {
        self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_name(&mut self, value: &str) -> Result<()> {
        require_text("department name", value)?;
        self.name = value.to_string();
        Ok(())
    }

    pub fn set_location(&mut self, value: &str) -> Result<()> {
        require_text("department location", value)?;
        self.location = value.to_string();
        Ok(())
    }

    /// Qualified lookup by national ID.
    pub fn employee_by_id(&self, national_id: &str) -> Option<PersonId> {
        self.employees.get(national_id).copied()
    }

    pub fn employees(&self) -> impl Iterator<Item = (&str, PersonId)> {
        self.employees.iter().map(|(nid, person)| (nid.as_str(), *person))
    }

    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }

    pub fn head(&self) -> Option<PersonId> {
        self.head
    }

    /// Maintained counter, not a recount.
    pub fn total_employees(&self) -> u32 {
        self.total_employees
    }
}

/// Input for `Hospital::create_room`.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub number: String,
    pub kind: String,
    pub capacity: u32,
}

impl NewRoom {
    pub(crate) fn validate(&self) -> Result<()> {
        require_text("room number", &self.number)?;
        require_text("room kind", &self.kind)?;
        if self.capacity == 0 {
            return Err(HospitalError::validation(
                "room capacity must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// A room owned by a department. Rooms have no existence outside one:
/// removal from the department strikes them from the global registry too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    id: RoomId,
    number: String,
    kind: String,
    capacity: u32,
    out_of_service: bool,
    pub(crate) department: DepartmentId,
    pub(crate) assignments: Vec<RoomAssignmentId>,
}

impl Room {
    /// Build from pre-validated input.
    pub(crate) fn from_parts(id: RoomId, department: DepartmentId, new: NewRoom) -> Self {
        Self {
            id,
            number: new.number,
            kind: new.kind,
            capacity: new.capacity,
            out_of_service: false,
            department,
            assignments: Vec::new(),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: u32) -> Result<()> {
        if capacity == 0 {
            return Err(HospitalError::validation(
                "room capacity must be greater than zero",
            ));
        }
        self.capacity = capacity;
        Ok(())
    }

    pub fn is_out_of_service(&self) -> bool {
        self.out_of_service
    }

    pub fn set_out_of_service(&mut self, out_of_service: bool) {
        self.out_of_service = out_of_service;
    }

    pub fn department(&self) -> DepartmentId {
        self.department
    }

    /// Every assignment ever made against this room, active and historical.
    pub fn assignments(&self) -> &[RoomAssignmentId] {
        &self.assignments
    }
}

/// A patient's stay in a room. Active while the discharge date is unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomAssignment {
    id: RoomAssignmentId,
    patient: PersonId,
    room: RoomId,
    admitted_at: DateTime<Utc>,
    pub(crate) discharged_at: Option<DateTime<Utc>>,
}

impl RoomAssignment {
    pub(crate) fn new(
        id: RoomAssignmentId,
        patient: PersonId,
        room: RoomId,
        admitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            patient,
            room,
            admitted_at,
            discharged_at: None,
        }
    }

    pub fn id(&self) -> RoomAssignmentId {
        self.id
    }

    pub fn patient(&self) -> PersonId {
        self.patient
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn admitted_at(&self) -> DateTime<Utc> {
        self.admitted_at
    }

    pub fn discharged_at(&self) -> Option<DateTime<Utc>> {
        self.discharged_at
    }

    pub fn is_active(&self) -> bool {
        self.discharged_at.is_none()
    }

    /// Stay length in whole days; open stays are measured up to now.
    pub fn stay_days(&self) -> i64 {
        let until = self.discharged_at.unwrap_or_else(Utc::now);
        (until - self.admitted_at).num_days()
    }
}
