//! Surgeries and the staff-participation association class.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ParticipationId, PersonId, SurgeryId};

/// A surgery on one patient, led by one surgeon. A duration of zero minutes
/// means open-ended: the end time is `None` and the surgery counts as active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Surgery {
    id: SurgeryId,
    patient: PersonId,
    surgeon: PersonId,
    kind: String,
    started_at: DateTime<Utc>,
    duration_minutes: u32,
    pub(crate) staff: Vec<ParticipationId>,
}

impl Surgery {
    pub(crate) fn new(
        id: SurgeryId,
        patient: PersonId,
        surgeon: PersonId,
        kind: String,
        started_at: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id,
            patient,
            surgeon,
            kind,
            started_at,
            duration_minutes,
            staff: Vec::new(),
        }
    }

    pub fn id(&self) -> SurgeryId {
        self.id
    }

    pub fn patient(&self) -> PersonId {
        self.patient
    }

    pub fn surgeon(&self) -> PersonId {
        self.surgeon
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Derived end time: start + duration, or `None` while open-ended.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        (self.duration_minutes > 0)
            .then(|| self.started_at + Duration::minutes(i64::from(self.duration_minutes)))
    }

    /// Active while no end time is defined.
    pub fn is_active(&self) -> bool {
        self.end_time().is_none()
    }

    pub fn staff(&self) -> &[ParticipationId] {
        &self.staff
    }

    pub(crate) fn set_duration_minutes(&mut self, minutes: u32) {
        self.duration_minutes = minutes;
    }
}

/// The role-bearing join entity between a surgery and one staff member.
/// Only ever constructed through `Hospital::add_surgery_staff`, which
/// registers it on both ends in the same operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurgeryStaffParticipation {
    id: ParticipationId,
    surgery: SurgeryId,
    staff: PersonId,
    role: String,
}

impl SurgeryStaffParticipation {
    pub(crate) fn new(
        id: ParticipationId,
        surgery: SurgeryId,
        staff: PersonId,
        role: String,
    ) -> Self {
        Self {
            id,
            surgery,
            staff,
            role,
        }
    }

    pub fn id(&self) -> ParticipationId {
        self.id
    }

    pub fn surgery(&self) -> SurgeryId {
        self.surgery
    }

    pub fn staff_member(&self) -> PersonId {
        self.staff
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}
