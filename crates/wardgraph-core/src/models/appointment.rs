//! Appointments between one patient and one doctor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AppointmentId, ConsultationId, DiagnosisId, PersonId, PrescriptionId};

/// Appointment lifecycle. `Completed` is terminal; there is no way back to
/// `Scheduled`, and a completed appointment's clinical outputs are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
}

/// A scheduled visit. A doctor holds at most one appointment per exact
/// timestamp; completing the visit produces the clinical result objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    id: AppointmentId,
    patient: PersonId,
    doctor: PersonId,
    scheduled_at: DateTime<Utc>,
    pub(crate) status: AppointmentStatus,
    pub(crate) consultation: Option<ConsultationId>,
    pub(crate) diagnosis: Option<DiagnosisId>,
    pub(crate) prescription: Option<PrescriptionId>,
    pub(crate) nurses: Vec<PersonId>,
}

impl Appointment {
    pub(crate) fn new(
        id: AppointmentId,
        patient: PersonId,
        doctor: PersonId,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            patient,
            doctor,
            scheduled_at,
            status: AppointmentStatus::Scheduled,
            consultation: None,
            diagnosis: None,
            prescription: None,
            nurses: Vec::new(),
        }
    }

    pub fn id(&self) -> AppointmentId {
        self.id
    }

    pub fn patient(&self) -> PersonId {
        self.patient
    }

    pub fn doctor(&self) -> PersonId {
        self.doctor
    }

    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == AppointmentStatus::Completed
    }

    /// The consultation produced on completion, if any.
    pub fn consultation(&self) -> Option<ConsultationId> {
        self.consultation
    }

    pub fn diagnosis(&self) -> Option<DiagnosisId> {
        self.diagnosis
    }

    pub fn prescription(&self) -> Option<PrescriptionId> {
        self.prescription
    }

    pub fn assisting_nurses(&self) -> &[PersonId] {
        &self.nurses
    }
}
