//! Medical records and the clinical result objects they own.
//!
//! A record owns its consultations, diagnoses and prescriptions outright;
//! appointments and surgeries are referenced through the patient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::Result;
use crate::ids::{
    AppointmentId, ConsultationId, DiagnosisId, MedicalRecordId, PersonId, PrescriptionId,
};

/// The per-patient history hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecord {
    id: MedicalRecordId,
    patient: PersonId,
    pub(crate) consultations: Vec<ConsultationId>,
    pub(crate) diagnoses: Vec<DiagnosisId>,
    pub(crate) prescriptions: Vec<PrescriptionId>,
}

impl MedicalRecord {
    pub(crate) fn new(id: MedicalRecordId, patient: PersonId) -> Self {
        Self {
            id,
            patient,
            consultations: Vec::new(),
            diagnoses: Vec::new(),
            prescriptions: Vec::new(),
        }
    }

    pub fn id(&self) -> MedicalRecordId {
        self.id
    }

    pub fn patient(&self) -> PersonId {
        self.patient
    }

    pub fn consultations(&self) -> &[ConsultationId] {
        &self.consultations
    }

    pub fn diagnoses(&self) -> &[DiagnosisId] {
        &self.diagnoses
    }

    pub fn prescriptions(&self) -> &[PrescriptionId] {
        &self.prescriptions
    }
}

/// Notes and recommendations from a completed visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Consultation {
    id: ConsultationId,
    record: MedicalRecordId,
    date: DateTime<Utc>,
    notes: String,
    recommendations: String,
    pub(crate) source_appointment: Option<AppointmentId>,
    pub(crate) diagnoses: Vec<DiagnosisId>,
    pub(crate) prescriptions: Vec<PrescriptionId>,
}

impl Consultation {
    pub(crate) fn new(
        id: ConsultationId,
        record: MedicalRecordId,
        date: DateTime<Utc>,
        notes: String,
    ) -> Self {
        Self {
            id,
            record,
            date,
            notes,
            recommendations: "General".to_string(),
            source_appointment: None,
            diagnoses: Vec::new(),
            prescriptions: Vec::new(),
        }
    }

    pub fn id(&self) -> ConsultationId {
        self.id
    }

    pub fn record(&self) -> MedicalRecordId {
        self.record
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn recommendations(&self) -> &str {
        &self.recommendations
    }

    pub fn set_recommendations(&mut self, value: &str) -> Result<()> {
        require_text("recommendations", value)?;
        self.recommendations = value.to_string();
        Ok(())
    }

    pub fn source_appointment(&self) -> Option<AppointmentId> {
        self.source_appointment
    }

    pub fn diagnoses(&self) -> &[DiagnosisId] {
        &self.diagnoses
    }

    pub fn prescriptions(&self) -> &[PrescriptionId] {
        &self.prescriptions
    }
}

/// A diagnosed condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnosis {
    id: DiagnosisId,
    record: MedicalRecordId,
    description: String,
    date: DateTime<Utc>,
    icd_codes: Vec<String>,
    pub(crate) consultation: Option<ConsultationId>,
    pub(crate) source_appointment: Option<AppointmentId>,
}

impl Diagnosis {
    pub(crate) fn new(
        id: DiagnosisId,
        record: MedicalRecordId,
        description: String,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            record,
            description,
            date,
            icd_codes: Vec::new(),
            consultation: None,
            source_appointment: None,
        }
    }

    pub fn id(&self) -> DiagnosisId {
        self.id
    }

    pub fn record(&self) -> MedicalRecordId {
        self.record
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn icd_codes(&self) -> &[String] {
        &self.icd_codes
    }

    /// Duplicate codes are ignored.
    pub fn add_icd_code(&mut self, code: &str) -> Result<()> {
        require_text("ICD code", code)?;
        if !self.icd_codes.iter().any(|c| c == code) {
            self.icd_codes.push(code.to_string());
        }
        Ok(())
    }

    pub fn consultation(&self) -> Option<ConsultationId> {
        self.consultation
    }

    pub fn source_appointment(&self) -> Option<AppointmentId> {
        self.source_appointment
    }
}

/// A prescribed medication with its dosage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    id: PrescriptionId,
    record: MedicalRecordId,
    medication: String,
    dosage: String,
    instructions: Option<String>,
    issued_at: DateTime<Utc>,
    pub(crate) consultation: Option<ConsultationId>,
    pub(crate) source_appointment: Option<AppointmentId>,
}

impl Prescription {
    pub(crate) fn new(
        id: PrescriptionId,
        record: MedicalRecordId,
        medication: String,
        dosage: String,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            record,
            medication,
            dosage,
            instructions: None,
            issued_at,
            consultation: None,
            source_appointment: None,
        }
    }

    pub fn id(&self) -> PrescriptionId {
        self.id
    }

    pub fn record(&self) -> MedicalRecordId {
        self.record
    }

    pub fn medication(&self) -> &str {
        &self.medication
    }

    pub fn dosage(&self) -> &str {
        &self.dosage
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    /// `None` clears the instructions.
    pub fn set_instructions(&mut self, value: Option<&str>) -> Result<()> {
        if let Some(value) = value {
            require_text("instructions", value)?;
        }
        self.instructions = value.map(str::to_string);
        Ok(())
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn consultation(&self) -> Option<ConsultationId> {
        self.consultation
    }

    pub fn source_appointment(&self) -> Option<AppointmentId> {
        self.source_appointment
    }
}
