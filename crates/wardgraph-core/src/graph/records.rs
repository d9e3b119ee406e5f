//! Standalone clinical entries against a patient's medical record.
//!
//! Completion of an appointment is the usual producer, but consultations,
//! diagnoses and prescriptions can also be recorded directly; their
//! source-appointment link simply stays unset.

use chrono::{DateTime, Duration, Utc};

use super::Hospital;
use crate::error::{HospitalError, Result};
use crate::ids::{ConsultationId, DiagnosisId, PersonId, PrescriptionId};
use crate::models::{require_text, Consultation, Diagnosis, Prescription};

impl Hospital {
    /// Record a consultation on the patient's medical record.
    pub fn record_consultation(
        &mut self,
        patient: PersonId,
        date: DateTime<Utc>,
        notes: &str,
    ) -> Result<ConsultationId> {
        require_text("notes", notes)?;
        if date > Utc::now() + Duration::days(1) {
            return Err(HospitalError::validation(
                "consultation date cannot be far in the future",
            ));
        }
        let record = self.person(patient)?.patient_info()?.record();
        self.medical_record(record)?;

        let consultation = self
            .consultations
            .alloc(|id| Consultation::new(id, record, date, notes.to_string()));
        if let Some(entry) = self.records.get_mut(record) {
            entry.consultations.push(consultation);
        }
        Ok(consultation)
    }

    /// Record a diagnosis on the patient's medical record.
    pub fn record_diagnosis(
        &mut self,
        patient: PersonId,
        description: &str,
        date: DateTime<Utc>,
    ) -> Result<DiagnosisId> {
        require_text("diagnosis description", description)?;
        let record = self.person(patient)?.patient_info()?.record();
        self.medical_record(record)?;

        let diagnosis = self
            .diagnoses
            .alloc(|id| Diagnosis::new(id, record, description.to_string(), date));
        if let Some(entry) = self.records.get_mut(record) {
            entry.diagnoses.push(diagnosis);
        }
        Ok(diagnosis)
    }

    /// Record a prescription on the patient's medical record.
    pub fn record_prescription(
        &mut self,
        patient: PersonId,
        medication: &str,
        dosage: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<PrescriptionId> {
        require_text("medication", medication)?;
        require_text("dosage", dosage)?;
        let record = self.person(patient)?.patient_info()?.record();
        self.medical_record(record)?;

        let prescription = self.prescriptions.alloc(|id| {
            Prescription::new(id, record, medication.to_string(), dosage.to_string(), issued_at)
        });
        if let Some(entry) = self.records.get_mut(record) {
            entry.prescriptions.push(prescription);
        }
        Ok(prescription)
    }
}
