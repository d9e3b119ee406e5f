//! The per-patient chronological history.
//!
//! Five unrelated record shapes contribute to one merged sequence, each
//! sorted by its own natural timestamp. `Dated` is the uniform extraction
//! point; the merge is a stable ascending sort, so same-instant records keep
//! their kind order (appointments, surgeries, consultations, diagnoses,
//! prescriptions).

use chrono::{DateTime, Utc};

use super::Hospital;
use crate::error::Result;
use crate::ids::{AppointmentId, ConsultationId, DiagnosisId, PersonId, PrescriptionId, SurgeryId};
use crate::models::{Appointment, Consultation, Diagnosis, Prescription, Surgery};

/// Uniform "when did this happen" over the five record shapes.
pub(crate) trait Dated {
    fn occurred_at(&self) -> DateTime<Utc>;
}

impl Dated for Appointment {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.scheduled_at()
    }
}

impl Dated for Surgery {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.started_at()
    }
}

impl Dated for Consultation {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.date()
    }
}

impl Dated for Diagnosis {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.date()
    }
}

impl Dated for Prescription {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.issued_at()
    }
}

/// One entry in a patient's merged history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEntry {
    Appointment(AppointmentId),
    Surgery(SurgeryId),
    Consultation(ConsultationId),
    Diagnosis(DiagnosisId),
    Prescription(PrescriptionId),
}

impl Hospital {
    /// All of a patient's records merged into one time-ordered sequence.
    ///
    /// Finite and restartable: each call walks the live graph afresh and the
    /// returned iterator owns its snapshot of the ordering.
    pub fn patient_history(
        &self,
        patient: PersonId,
    ) -> Result<impl Iterator<Item = HistoryEntry>> {
        let info = self.person(patient)?.patient_info()?;
        let record = self.medical_record(info.record())?;

        let mut dated: Vec<(DateTime<Utc>, HistoryEntry)> = Vec::new();
        for id in info.appointments() {
            if let Some(entry) = self.appointments.get(*id) {
                dated.push((entry.occurred_at(), HistoryEntry::Appointment(*id)));
            }
        }
        for id in info.surgeries() {
            if let Some(entry) = self.surgeries.get(*id) {
                dated.push((entry.occurred_at(), HistoryEntry::Surgery(*id)));
            }
        }
        for id in record.consultations() {
            if let Some(entry) = self.consultations.get(*id) {
                dated.push((entry.occurred_at(), HistoryEntry::Consultation(*id)));
            }
        }
        for id in record.diagnoses() {
            if let Some(entry) = self.diagnoses.get(*id) {
                dated.push((entry.occurred_at(), HistoryEntry::Diagnosis(*id)));
            }
        }
        for id in record.prescriptions() {
            if let Some(entry) = self.prescriptions.get(*id) {
                dated.push((entry.occurred_at(), HistoryEntry::Prescription(*id)));
            }
        }

        // stable: equal keys keep push order
        dated.sort_by_key(|(at, _)| *at);
        Ok(dated.into_iter().map(|(_, entry)| entry))
    }
}
