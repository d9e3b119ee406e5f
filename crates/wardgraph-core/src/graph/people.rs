//! Capability grants and person-to-person links.

use super::Hospital;
use crate::error::{ConstraintViolation, HospitalError, Result};
use crate::ids::{AddressId, DepartmentId, PersonId};
use crate::models::{EmployeeInfo, EmployeeKind, MedicalRecord, PatientInfo};

impl Hospital {
    /// Grant the patient capability. Allocates the patient's medical record
    /// and links the responsible doctor, who must hold the doctor capability.
    pub fn grant_patient(&mut self, person: PersonId, responsible: PersonId) -> Result<()> {
        if !self.person(responsible)?.is_doctor() {
            return Err(HospitalError::capability(
                "responsible doctor must hold the doctor capability",
            ));
        }
        if self.person(person)?.is_patient() {
            return Err(HospitalError::capability("person is already a patient"));
        }

        let record = self.records.alloc(|id| MedicalRecord::new(id, person));
        if let Some(entry) = self.people.get_mut(person) {
            entry.patient = Some(PatientInfo::new(responsible, record));
        }
        if let Some(doctor) = self.people.get_mut(responsible) {
            if let Ok(info) = doctor.doctor_info_mut() {
                if !info.patients.contains(&person) {
                    info.patients.push(person);
                }
            }
        }
        tracing::debug!(
            patient = person.raw(),
            doctor = responsible.raw(),
            "granted patient capability"
        );
        Ok(())
    }

    /// Grant the employee capability and link the person into `department`.
    /// Fails if the person is already employed anywhere.
    pub fn grant_employee(
        &mut self,
        person: PersonId,
        kind: EmployeeKind,
        department: DepartmentId,
        salary: f64,
    ) -> Result<()> {
        if salary < 0.0 {
            return Err(HospitalError::validation("salary cannot be negative"));
        }
        if self.person(person)?.is_employee() {
            return Err(ConstraintViolation::AlreadyEmployed.into());
        }
        let national_id = self.person(person)?.national_id().to_string();
        match self.department(department)?.employee_by_id(&national_id) {
            Some(existing) if existing != person => {
                return Err(ConstraintViolation::EmployeeIdTaken(national_id).into());
            }
            _ => {}
        }

        if let Some(entry) = self.people.get_mut(person) {
            let mut info = EmployeeInfo::new(kind, salary);
            info.department = Some(department);
            entry.employee = Some(info);
        }
        if let Some(entry) = self.departments.get_mut(department) {
            entry.employees.insert(national_id, person);
            entry.total_employees += 1;
        }
        tracing::debug!(
            employee = person.raw(),
            department = department.raw(),
            ?kind,
            "granted employee capability"
        );
        Ok(())
    }

    /// Exclusive 1:1 person-address link. Re-assigning the address already in
    /// place is a no-op; an address attached to a different person is refused.
    pub fn set_address(&mut self, person: PersonId, address: AddressId) -> Result<()> {
        let current = self.person(person)?.address();
        if current == address {
            return Ok(());
        }
        match self.address(address)?.person() {
            Some(holder) if holder != person => {
                return Err(ConstraintViolation::AddressInUse.into());
            }
            _ => {}
        }

        if let Some(old) = self.addresses.get_mut(current) {
            old.person = None;
        }
        if let Some(entry) = self.people.get_mut(person) {
            entry.address = address;
        }
        if let Some(new) = self.addresses.get_mut(address) {
            new.person = Some(person);
        }
        Ok(())
    }

    /// Exclusive relink of a patient's responsible doctor: the old doctor's
    /// back-reference is cleared before the new one is set.
    pub fn set_responsible_doctor(&mut self, patient: PersonId, doctor: PersonId) -> Result<()> {
        let current = self.person(patient)?.patient_info()?.responsible_doctor();
        if !self.person(doctor)?.is_doctor() {
            return Err(HospitalError::capability(
                "responsible doctor must hold the doctor capability",
            ));
        }
        if current == doctor {
            return Ok(());
        }

        if let Some(old) = self.people.get_mut(current) {
            if let Ok(info) = old.doctor_info_mut() {
                info.patients.retain(|p| *p != patient);
            }
        }
        if let Some(entry) = self.people.get_mut(patient) {
            if let Ok(info) = entry.patient_info_mut() {
                info.responsible_doctor = doctor;
            }
        }
        if let Some(new) = self.people.get_mut(doctor) {
            if let Ok(info) = new.doctor_info_mut() {
                if !info.patients.contains(&patient) {
                    info.patients.push(patient);
                }
            }
        }
        Ok(())
    }

    /// Link a supervising doctor. A doctor cannot supervise themselves, and a
    /// supervisee keeps at most one supervisor at a time.
    pub fn set_supervisor(&mut self, doctor: PersonId, supervisor: PersonId) -> Result<()> {
        let current = self.person(doctor)?.doctor_info()?.supervisor();
        self.person(supervisor)?.doctor_info()?;
        if doctor == supervisor {
            return Err(ConstraintViolation::SelfSupervision.into());
        }
        match current {
            Some(existing) if existing == supervisor => return Ok(()),
            Some(_) => return Err(ConstraintViolation::SupervisorAlreadySet.into()),
            None => {}
        }

        if let Some(entry) = self.people.get_mut(doctor) {
            if let Ok(info) = entry.doctor_info_mut() {
                info.supervisor = Some(supervisor);
            }
        }
        if let Some(entry) = self.people.get_mut(supervisor) {
            if let Ok(info) = entry.doctor_info_mut() {
                if !info.supervised.contains(&doctor) {
                    info.supervised.push(doctor);
                }
            }
        }
        Ok(())
    }

    /// Detach a doctor's supervisor. No-op when none is set.
    pub fn clear_supervisor(&mut self, doctor: PersonId) -> Result<()> {
        let Some(current) = self.person(doctor)?.doctor_info()?.supervisor() else {
            return Ok(());
        };

        if let Some(entry) = self.people.get_mut(current) {
            if let Ok(info) = entry.doctor_info_mut() {
                info.supervised.retain(|d| *d != doctor);
            }
        }
        if let Some(entry) = self.people.get_mut(doctor) {
            if let Ok(info) = entry.doctor_info_mut() {
                info.supervisor = None;
            }
        }
        Ok(())
    }

    /// Detach `doctor` from `supervisor`'s supervised list. No-op unless the
    /// link is currently in place.
    pub fn remove_supervised(&mut self, supervisor: PersonId, doctor: PersonId) -> Result<()> {
        if self.person(doctor)?.doctor_info()?.supervisor() == Some(supervisor) {
            self.clear_supervisor(doctor)?;
        }
        Ok(())
    }
}
