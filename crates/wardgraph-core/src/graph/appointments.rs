//! Appointment booking, nurse assistance, and the completion transition.

use chrono::{DateTime, Utc};

use super::Hospital;
use crate::error::{ConstraintViolation, HospitalError, Result};
use crate::ids::{AppointmentId, ConsultationId, PersonId};
use crate::models::{
    Appointment, AppointmentStatus, Consultation, Diagnosis, Prescription,
};

impl Hospital {
    /// Book an appointment. The timestamp is a qualified key on the doctor's
    /// side: one doctor never holds two appointments at the same instant.
    pub fn schedule_appointment(
        &mut self,
        patient: PersonId,
        doctor: PersonId,
        at: DateTime<Utc>,
    ) -> Result<AppointmentId> {
        self.person(patient)?.patient_info()?;
        let conducted = self.person(doctor)?.doctor_info()?.conducted();
        if at < Utc::now() {
            return Err(HospitalError::validation("appointment cannot be in the past"));
        }
        if conducted.contains_key(&at) {
            return Err(ConstraintViolation::DoubleBooking(at).into());
        }

        let appointment = self
            .appointments
            .alloc(|id| Appointment::new(id, patient, doctor, at));
        if let Some(entry) = self.people.get_mut(patient) {
            if let Ok(info) = entry.patient_info_mut() {
                info.appointments.push(appointment);
            }
        }
        if let Some(entry) = self.people.get_mut(doctor) {
            if let Ok(info) = entry.doctor_info_mut() {
                info.conducted.insert(at, appointment);
            }
        }
        tracing::debug!(
            appointment = appointment.raw(),
            patient = patient.raw(),
            doctor = doctor.raw(),
            %at,
            "scheduled appointment"
        );
        Ok(appointment)
    }

    /// Attach an assisting nurse. A nurse assists at most one appointment at
    /// a time, globally; re-adding the same appointment is a no-op.
    pub fn add_assisting_nurse(
        &mut self,
        appointment: AppointmentId,
        nurse: PersonId,
    ) -> Result<()> {
        self.appointment(appointment)?;
        match self.person(nurse)?.nurse_info()?.assisting() {
            Some(current) if current == appointment => return Ok(()),
            Some(_) => return Err(ConstraintViolation::NurseOccupied.into()),
            None => {}
        }

        if let Some(entry) = self.appointments.get_mut(appointment) {
            if !entry.nurses.contains(&nurse) {
                entry.nurses.push(nurse);
            }
        }
        if let Some(entry) = self.people.get_mut(nurse) {
            if let Ok(info) = entry.nurse_info_mut() {
                info.assisting = Some(appointment);
            }
        }
        Ok(())
    }

    /// Detach an assisting nurse from both ends. No-op if not linked.
    pub fn remove_assisting_nurse(
        &mut self,
        appointment: AppointmentId,
        nurse: PersonId,
    ) -> Result<()> {
        self.appointment(appointment)?;
        if self.person(nurse)?.nurse_info()?.assisting() != Some(appointment) {
            return Ok(());
        }

        if let Some(entry) = self.appointments.get_mut(appointment) {
            entry.nurses.retain(|n| *n != nurse);
        }
        if let Some(entry) = self.people.get_mut(nurse) {
            if let Ok(info) = entry.nurse_info_mut() {
                info.assisting = None;
            }
        }
        Ok(())
    }

    /// The one state-machine transition: Scheduled → Completed (terminal).
    ///
    /// Always creates a consultation against the patient's medical record.
    /// A diagnosis is created when `diagnosis` is given; a prescription only
    /// when both `medication` and `dosage` are given. Every created object is
    /// cross-linked to the consultation and back to this appointment.
    pub fn complete_appointment(
        &mut self,
        appointment: AppointmentId,
        notes: &str,
        diagnosis: Option<&str>,
        medication: Option<&str>,
        dosage: Option<&str>,
    ) -> Result<ConsultationId> {
        crate::models::require_text("notes", notes)?;
        if let Some(description) = diagnosis {
            crate::models::require_text("diagnosis description", description)?;
        }
        if let Some(medication) = medication {
            crate::models::require_text("medication", medication)?;
        }
        if let Some(dosage) = dosage {
            crate::models::require_text("dosage", dosage)?;
        }

        let entry = self.appointment(appointment)?;
        if entry.is_completed() {
            return Err(ConstraintViolation::AlreadyCompleted.into());
        }
        let patient = entry.patient();
        let record = self.person(patient)?.patient_info()?.record();
        self.medical_record(record)?;
        let now = Utc::now();

        let consultation = self.consultations.alloc(|id| {
            let mut c = Consultation::new(id, record, now, notes.to_string());
            c.source_appointment = Some(appointment);
            c
        });
        if let Some(entry) = self.records.get_mut(record) {
            entry.consultations.push(consultation);
        }

        let diagnosis_id = diagnosis.map(|description| {
            let id = self.diagnoses.alloc(|id| {
                let mut d = Diagnosis::new(id, record, description.to_string(), now);
                d.consultation = Some(consultation);
                d.source_appointment = Some(appointment);
                d
            });
            if let Some(entry) = self.records.get_mut(record) {
                entry.diagnoses.push(id);
            }
            if let Some(entry) = self.consultations.get_mut(consultation) {
                entry.diagnoses.push(id);
            }
            id
        });

        let prescription_id = match (medication, dosage) {
            (Some(medication), Some(dosage)) => {
                let id = self.prescriptions.alloc(|id| {
                    let mut p = Prescription::new(
                        id,
                        record,
                        medication.to_string(),
                        dosage.to_string(),
                        now,
                    );
                    p.consultation = Some(consultation);
                    p.source_appointment = Some(appointment);
                    p
                });
                if let Some(entry) = self.records.get_mut(record) {
                    entry.prescriptions.push(id);
                }
                if let Some(entry) = self.consultations.get_mut(consultation) {
                    entry.prescriptions.push(id);
                }
                Some(id)
            }
            _ => None,
        };

        if let Some(entry) = self.appointments.get_mut(appointment) {
            entry.status = AppointmentStatus::Completed;
            entry.consultation = Some(consultation);
            entry.diagnosis = diagnosis_id;
            entry.prescription = prescription_id;
        }
        tracing::info!(
            appointment = appointment.raw(),
            consultation = consultation.raw(),
            "completed appointment"
        );
        Ok(consultation)
    }

    /// Cancel a scheduled appointment: the entity is de-registered and both
    /// ends are unlinked, including any assisting nurses. Completed
    /// appointments cannot be cancelled.
    pub fn cancel_appointment(&mut self, appointment: AppointmentId) -> Result<()> {
        let entry = self.appointment(appointment)?;
        if entry.is_completed() {
            return Err(ConstraintViolation::AlreadyCompleted.into());
        }
        let patient = entry.patient();
        let doctor = entry.doctor();
        let at = entry.scheduled_at();
        let nurses = entry.assisting_nurses().to_vec();

        if let Some(entry) = self.people.get_mut(patient) {
            if let Ok(info) = entry.patient_info_mut() {
                info.appointments.retain(|a| *a != appointment);
            }
        }
        if let Some(entry) = self.people.get_mut(doctor) {
            if let Ok(info) = entry.doctor_info_mut() {
                // qualified removal: only drop the key if it still maps to
                // this appointment
                if info.conducted.get(&at) == Some(&appointment) {
                    info.conducted.remove(&at);
                }
            }
        }
        for nurse in nurses {
            if let Some(entry) = self.people.get_mut(nurse) {
                if let Ok(info) = entry.nurse_info_mut() {
                    if info.assisting == Some(appointment) {
                        info.assisting = None;
                    }
                }
            }
        }
        self.appointments.remove(appointment);
        tracing::debug!(appointment = appointment.raw(), "cancelled appointment");
        Ok(())
    }

    /// Conducted appointments in time order; the qualified map is already
    /// keyed by timestamp.
    pub fn doctor_appointments_chronologically(
        &self,
        doctor: PersonId,
    ) -> Result<Vec<AppointmentId>> {
        Ok(self
            .person(doctor)?
            .doctor_info()?
            .conducted()
            .values()
            .copied()
            .collect())
    }
}
