//! Room admissions, surgeries, and surgery staffing.
//!
//! Admission and active surgery are mutually exclusive patient states; the
//! exclusion is enforced on both creation paths, before any link commits.

use chrono::{DateTime, Utc};

use super::Hospital;
use crate::error::{ConstraintViolation, HospitalError, Result};
use crate::ids::{ParticipationId, PersonId, RoomAssignmentId, RoomId, SurgeryId};
use crate::models::{RoomAssignment, Surgery, SurgeryStaffParticipation};

impl Hospital {
    fn has_active_admission(&self, patient: &crate::models::PatientInfo) -> bool {
        patient
            .admissions()
            .iter()
            .filter_map(|id| self.assignments.get(*id))
            .any(|a| a.is_active())
    }

    fn has_active_surgery(&self, patient: &crate::models::PatientInfo) -> bool {
        patient
            .surgeries()
            .iter()
            .filter_map(|id| self.surgeries.get(*id))
            .any(|s| s.is_active())
    }

    /// Admit a patient to a room. Rejected while the patient has an active
    /// admission or an active surgery, and when the room is unavailable.
    pub fn admit_patient(
        &mut self,
        patient: PersonId,
        room: RoomId,
        admitted_at: DateTime<Utc>,
    ) -> Result<RoomAssignmentId> {
        if admitted_at > Utc::now() {
            return Err(HospitalError::validation(
                "admission date cannot be in the future",
            ));
        }
        let info = self.person(patient)?.patient_info()?;
        if self.has_active_admission(info) {
            return Err(ConstraintViolation::ActiveAdmission.into());
        }
        if self.has_active_surgery(info) {
            return Err(ConstraintViolation::ActiveSurgery.into());
        }
        if self.room(room)?.is_out_of_service() {
            return Err(ConstraintViolation::RoomOutOfService.into());
        }
        if self.room_is_full(room)? {
            return Err(ConstraintViolation::RoomFull.into());
        }

        let assignment = self
            .assignments
            .alloc(|id| RoomAssignment::new(id, patient, room, admitted_at));
        if let Some(entry) = self.rooms.get_mut(room) {
            entry.assignments.push(assignment);
        }
        if let Some(entry) = self.people.get_mut(patient) {
            if let Ok(info) = entry.patient_info_mut() {
                info.admissions.push(assignment);
            }
        }
        tracing::debug!(
            assignment = assignment.raw(),
            patient = patient.raw(),
            room = room.raw(),
            "admitted patient"
        );
        Ok(assignment)
    }

    /// Close an admission. The discharge date never precedes the admission
    /// date, and an assignment is discharged at most once.
    pub fn discharge_patient(
        &mut self,
        assignment: RoomAssignmentId,
        discharged_at: DateTime<Utc>,
    ) -> Result<()> {
        let entry = self.assignment(assignment)?;
        if !entry.is_active() {
            return Err(ConstraintViolation::AlreadyDischarged.into());
        }
        if discharged_at < entry.admitted_at() {
            return Err(HospitalError::validation(
                "discharge date cannot precede the admission date",
            ));
        }
        if let Some(entry) = self.assignments.get_mut(assignment) {
            entry.discharged_at = Some(discharged_at);
        }
        tracing::debug!(assignment = assignment.raw(), "discharged patient");
        Ok(())
    }

    /// Schedule a surgery. The surgeon must hold the Surgeon role; a patient
    /// with an active admission cannot go into surgery (symmetric to the
    /// admission-side check). Zero duration leaves the surgery open-ended.
    pub fn schedule_surgery(
        &mut self,
        patient: PersonId,
        surgeon: PersonId,
        kind: &str,
        started_at: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Result<SurgeryId> {
        crate::models::require_text("surgery kind", kind)?;
        if !self.person(surgeon)?.doctor_info()?.roles().surgeon {
            return Err(HospitalError::capability(
                "surgeon must hold the surgeon role",
            ));
        }
        let info = self.person(patient)?.patient_info()?;
        if self.has_active_admission(info) {
            return Err(ConstraintViolation::ActiveAdmission.into());
        }

        let surgery = self.surgeries.alloc(|id| {
            Surgery::new(id, patient, surgeon, kind.to_string(), started_at, duration_minutes)
        });
        if let Some(entry) = self.people.get_mut(patient) {
            if let Ok(info) = entry.patient_info_mut() {
                info.surgeries.push(surgery);
            }
        }
        tracing::debug!(
            surgery = surgery.raw(),
            patient = patient.raw(),
            surgeon = surgeon.raw(),
            "scheduled surgery"
        );
        Ok(surgery)
    }

    /// Define (or redefine) a surgery's duration. Setting a positive value
    /// gives the surgery its derived end time.
    pub fn set_surgery_duration(&mut self, surgery: SurgeryId, minutes: u32) -> Result<()> {
        self.surgeries
            .get_mut(surgery)
            .ok_or(HospitalError::NotFound { kind: "surgery" })?
            .set_duration_minutes(minutes);
        Ok(())
    }

    /// Create the role-bearing join entity between a surgery and one staff
    /// member, registering it on both ends. Adding the same staff member to
    /// the same surgery again returns the existing participation.
    pub fn add_surgery_staff(
        &mut self,
        surgery: SurgeryId,
        staff: PersonId,
        role: &str,
    ) -> Result<ParticipationId> {
        crate::models::require_text("role", role)?;
        self.person(staff)?.employee_info()?;
        let existing = self
            .surgery(surgery)?
            .staff()
            .iter()
            .filter_map(|id| self.participations.get(*id))
            .find(|p| p.staff_member() == staff)
            .map(|p| p.id());
        if let Some(existing) = existing {
            return Ok(existing);
        }

        let participation = self
            .participations
            .alloc(|id| SurgeryStaffParticipation::new(id, surgery, staff, role.to_string()));
        if let Some(entry) = self.surgeries.get_mut(surgery) {
            entry.staff.push(participation);
        }
        if let Some(entry) = self.people.get_mut(staff) {
            if let Ok(info) = entry.employee_info_mut() {
                info.participations.push(participation);
            }
        }
        Ok(participation)
    }

    /// Remove a staff member's participation from a surgery. The join entity
    /// is unlinked from both ends and de-registered. No-op if absent.
    pub fn remove_surgery_staff(&mut self, surgery: SurgeryId, staff: PersonId) -> Result<()> {
        let Some(participation) = self
            .surgery(surgery)?
            .staff()
            .iter()
            .filter_map(|id| self.participations.get(*id))
            .find(|p| p.staff_member() == staff)
            .map(|p| p.id())
        else {
            return Ok(());
        };

        if let Some(entry) = self.surgeries.get_mut(surgery) {
            entry.staff.retain(|p| *p != participation);
        }
        if let Some(entry) = self.people.get_mut(staff) {
            if let Ok(info) = entry.employee_info_mut() {
                info.participations.retain(|p| *p != participation);
            }
        }
        self.participations.remove(participation);
        Ok(())
    }
}
