//! The live hospital graph.
//!
//! One `Hospital` owns every per-type extent and is the only writer. Every
//! relationship mutation goes through an operation here that checks the
//! constraint layer first and then updates both ends of the link, so a failed
//! call never leaves partial state behind.

mod admissions;
mod appointments;
mod departments;
mod history;
mod people;
mod records;

pub use history::HistoryEntry;

use uuid::Uuid;

use crate::error::{HospitalError, Result};
use crate::extent::Extent;
use crate::ids::{
    AddressId, AppointmentId, ConsultationId, DepartmentId, DiagnosisId, MedicalRecordId,
    ParticipationId, PersonId, PrescriptionId, RoomAssignmentId, RoomId, SurgeryId,
};
use crate::models::{
    Address, Appointment, Consultation, Department, Diagnosis, MedicalRecord, NewAddress,
    NewPerson, Person, Prescription, Room, RoomAssignment, Surgery, SurgeryStaffParticipation,
};

/// Single-writer, in-process context owning every entity extent.
#[derive(Debug, Clone, Default)]
pub struct Hospital {
    pub(crate) people: Extent<Person>,
    pub(crate) addresses: Extent<Address>,
    pub(crate) departments: Extent<Department>,
    pub(crate) rooms: Extent<Room>,
    pub(crate) assignments: Extent<RoomAssignment>,
    pub(crate) appointments: Extent<Appointment>,
    pub(crate) surgeries: Extent<Surgery>,
    pub(crate) participations: Extent<SurgeryStaffParticipation>,
    pub(crate) records: Extent<MedicalRecord>,
    pub(crate) consultations: Extent<Consultation>,
    pub(crate) diagnoses: Extent<Diagnosis>,
    pub(crate) prescriptions: Extent<Prescription>,
}

impl Hospital {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entity while keeping handle counters running, so handles
    /// issued before the reset stay stale.
    pub fn reset(&mut self) {
        self.people.clear();
        self.addresses.clear();
        self.departments.clear();
        self.rooms.clear();
        self.assignments.clear();
        self.appointments.clear();
        self.surgeries.clear();
        self.participations.clear();
        self.records.clear();
        self.consultations.clear();
        self.diagnoses.clear();
        self.prescriptions.clear();
    }

    // ─── registration ────────────────────────────────────────────────────

    /// Register a person. A placeholder address is allocated and attached,
    /// since every person has one.
    pub fn register_person(&mut self, new: NewPerson) -> Result<PersonId> {
        new.validate()?;
        let address = self.addresses.alloc(Address::placeholder);
        let person = self
            .people
            .alloc(|id| Person::from_parts(id, address, new));
        if let Some(entry) = self.addresses.get_mut(address) {
            entry.person = Some(person);
        }
        tracing::debug!(person = person.raw(), "registered person");
        Ok(person)
    }

    /// Register an unattached address for later linking.
    pub fn register_address(&mut self, new: NewAddress) -> Result<AddressId> {
        new.validate()?;
        Ok(self.addresses.alloc(|id| Address::from_new(id, new)))
    }

    /// Register a department, minting its unique identifier.
    pub fn register_department(&mut self, name: &str, location: &str) -> Result<DepartmentId> {
        crate::models::require_text("department name", name)?;
        crate::models::require_text("department location", location)?;
        let uid = Uuid::new_v4();
        let department = self
            .departments
            .alloc(|id| Department::new(id, uid, name.to_string(), location.to_string()));
        tracing::debug!(department = department.raw(), %uid, "registered department");
        Ok(department)
    }

    // ─── typed accessors ─────────────────────────────────────────────────

    pub fn person(&self, id: PersonId) -> Result<&Person> {
        self.people.get(id).ok_or(HospitalError::NotFound { kind: "person" })
    }

    pub fn person_mut(&mut self, id: PersonId) -> Result<&mut Person> {
        self.people
            .get_mut(id)
            .ok_or(HospitalError::NotFound { kind: "person" })
    }

    pub fn address(&self, id: AddressId) -> Result<&Address> {
        self.addresses
            .get(id)
            .ok_or(HospitalError::NotFound { kind: "address" })
    }

    pub fn address_mut(&mut self, id: AddressId) -> Result<&mut Address> {
        self.addresses
            .get_mut(id)
            .ok_or(HospitalError::NotFound { kind: "address" })
    }

    pub fn department(&self, id: DepartmentId) -> Result<&Department> {
        self.departments
            .get(id)
            .ok_or(HospitalError::NotFound { kind: "department" })
    }

    pub fn department_mut(&mut self, id: DepartmentId) -> Result<&mut Department> {
        self.departments
            .get_mut(id)
            .ok_or(HospitalError::NotFound { kind: "department" })
    }

    pub fn room(&self, id: RoomId) -> Result<&Room> {
        self.rooms.get(id).ok_or(HospitalError::NotFound { kind: "room" })
    }

    pub fn room_mut(&mut self, id: RoomId) -> Result<&mut Room> {
        self.rooms
            .get_mut(id)
            .ok_or(HospitalError::NotFound { kind: "room" })
    }

    pub fn assignment(&self, id: RoomAssignmentId) -> Result<&RoomAssignment> {
        self.assignments
            .get(id)
            .ok_or(HospitalError::NotFound { kind: "room assignment" })
    }

    pub fn appointment(&self, id: AppointmentId) -> Result<&Appointment> {
        self.appointments
            .get(id)
            .ok_or(HospitalError::NotFound { kind: "appointment" })
    }

    pub fn surgery(&self, id: SurgeryId) -> Result<&Surgery> {
        self.surgeries
            .get(id)
            .ok_or(HospitalError::NotFound { kind: "surgery" })
    }

    pub fn participation(&self, id: ParticipationId) -> Result<&SurgeryStaffParticipation> {
        self.participations
            .get(id)
            .ok_or(HospitalError::NotFound { kind: "surgery staff participation" })
    }

    pub fn medical_record(&self, id: MedicalRecordId) -> Result<&MedicalRecord> {
        self.records
            .get(id)
            .ok_or(HospitalError::NotFound { kind: "medical record" })
    }

    pub fn consultation(&self, id: ConsultationId) -> Result<&Consultation> {
        self.consultations
            .get(id)
            .ok_or(HospitalError::NotFound { kind: "consultation" })
    }

    pub fn consultation_mut(&mut self, id: ConsultationId) -> Result<&mut Consultation> {
        self.consultations
            .get_mut(id)
            .ok_or(HospitalError::NotFound { kind: "consultation" })
    }

    pub fn diagnosis(&self, id: DiagnosisId) -> Result<&Diagnosis> {
        self.diagnoses
            .get(id)
            .ok_or(HospitalError::NotFound { kind: "diagnosis" })
    }

    pub fn diagnosis_mut(&mut self, id: DiagnosisId) -> Result<&mut Diagnosis> {
        self.diagnoses
            .get_mut(id)
            .ok_or(HospitalError::NotFound { kind: "diagnosis" })
    }

    pub fn prescription(&self, id: PrescriptionId) -> Result<&Prescription> {
        self.prescriptions
            .get(id)
            .ok_or(HospitalError::NotFound { kind: "prescription" })
    }

    pub fn prescription_mut(&mut self, id: PrescriptionId) -> Result<&mut Prescription> {
        self.prescriptions
            .get_mut(id)
            .ok_or(HospitalError::NotFound { kind: "prescription" })
    }

    // ─── extent iteration (insertion order) ──────────────────────────────

    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.addresses.values()
    }

    pub fn departments(&self) -> impl Iterator<Item = &Department> {
        self.departments.values()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn assignments(&self) -> impl Iterator<Item = &RoomAssignment> {
        self.assignments.values()
    }

    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.values()
    }

    pub fn surgeries(&self) -> impl Iterator<Item = &Surgery> {
        self.surgeries.values()
    }

    pub fn participations(&self) -> impl Iterator<Item = &SurgeryStaffParticipation> {
        self.participations.values()
    }

    pub fn medical_records(&self) -> impl Iterator<Item = &MedicalRecord> {
        self.records.values()
    }

    pub fn consultations(&self) -> impl Iterator<Item = &Consultation> {
        self.consultations.values()
    }

    pub fn diagnoses(&self) -> impl Iterator<Item = &Diagnosis> {
        self.diagnoses.values()
    }

    pub fn prescriptions(&self) -> impl Iterator<Item = &Prescription> {
        self.prescriptions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ada() -> NewPerson {
        NewPerson {
            name: "Ada".into(),
            surname: "Nowak".into(),
            national_id: "90010112345".into(),
            gender: "F".into(),
            phone_number: "555-0100".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        }
    }

    #[test]
    fn registering_a_person_attaches_a_placeholder_address() {
        let mut hospital = Hospital::new();
        let person = hospital.register_person(ada()).unwrap();

        let address = hospital.person(person).unwrap().address();
        assert_eq!(hospital.address(address).unwrap().person(), Some(person));
        assert_eq!(hospital.address(address).unwrap().country(), "Unknown");
    }

    #[test]
    fn department_registration_mints_distinct_uids() {
        let mut hospital = Hospital::new();
        let a = hospital.register_department("Cardiology", "Floor 1").unwrap();
        let b = hospital.register_department("Neurology", "Floor 2").unwrap();
        assert_ne!(
            hospital.department(a).unwrap().uid(),
            hospital.department(b).unwrap().uid()
        );
        assert!(hospital.register_department(" ", "x").is_err());
    }

    #[test]
    fn reset_leaves_old_handles_stale() {
        let mut hospital = Hospital::new();
        let person = hospital.register_person(ada()).unwrap();
        hospital.reset();
        assert!(hospital.person(person).is_err());
        assert_eq!(hospital.people().count(), 0);
    }
}
