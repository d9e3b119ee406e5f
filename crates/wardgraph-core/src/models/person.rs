//! The capability-tagged person entity.
//!
//! One type plays every people-role in the hospital. Instead of a class
//! hierarchy, a person carries optional capability blocks (`PatientInfo`,
//! `EmployeeInfo` with nested doctor/nurse detail) and "is-a" queries are
//! plain flag checks. Role-gated setters refuse mutation while the owning
//! capability is absent; capabilities are additive and never revoked.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::{HospitalError, Result};
use crate::ids::{
    AddressId, AppointmentId, DepartmentId, MedicalRecordId, ParticipationId, PersonId,
    RoomAssignmentId, SurgeryId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeKind {
    Doctor,
    Nurse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentKind {
    Permanent,
    Contractor,
}

/// Orthogonal doctor roles; a doctor may hold both at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRoles {
    pub consultant: bool,
    pub surgeon: bool,
}

impl DoctorRoles {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            consultant: true,
            surgeon: true,
        }
    }
}

/// Employment terms for a doctor. Contractors always have an end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employment {
    pub kind: EmploymentKind,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

/// Doctor-specific capability state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorInfo {
    specialization: String,
    license_number: String,
    pub(crate) roles: DoctorRoles,
    pub(crate) employment: Option<Employment>,
    consulting_hours: Option<String>,
    surgeon_speciality: Option<String>,
    pub(crate) supervisor: Option<PersonId>,
    pub(crate) supervised: Vec<PersonId>,
    pub(crate) patients: Vec<PersonId>,
    pub(crate) conducted: BTreeMap<DateTime<Utc>, AppointmentId>,
    pub(crate) heads: Option<DepartmentId>,
}

impl Default for DoctorInfo {
    fn default() -> Self {
        Self {
            specialization: "General".to_string(),
            license_number: "00000".to_string(),
            roles: DoctorRoles::none(),
            employment: None,
            consulting_hours: None,
            surgeon_speciality: None,
            supervisor: None,
            supervised: Vec::new(),
            patients: Vec::new(),
            conducted: BTreeMap::new(),
            heads: None,
        }
    }
}

impl DoctorInfo {
    pub fn specialization(&self) -> &str {
        &self.specialization
    }

    pub fn license_number(&self) -> &str {
        &self.license_number
    }

    pub fn roles(&self) -> DoctorRoles {
        self.roles
    }

    pub fn employment(&self) -> Option<Employment> {
        self.employment
    }

    pub fn is_permanent(&self) -> bool {
        matches!(
            self.employment,
            Some(Employment {
                kind: EmploymentKind::Permanent,
                ..
            })
        )
    }

    pub fn consulting_hours(&self) -> Option<&str> {
        self.consulting_hours.as_deref()
    }

    pub fn surgeon_speciality(&self) -> Option<&str> {
        self.surgeon_speciality.as_deref()
    }

    pub fn supervisor(&self) -> Option<PersonId> {
        self.supervisor
    }

    pub fn supervised(&self) -> &[PersonId] {
        &self.supervised
    }

    pub fn patients(&self) -> &[PersonId] {
        &self.patients
    }

    /// Appointments conducted by this doctor, keyed by their timestamp.
    pub fn conducted(&self) -> &BTreeMap<DateTime<Utc>, AppointmentId> {
        &self.conducted
    }

    pub fn heads(&self) -> Option<DepartmentId> {
        self.heads
    }
}

/// Nurse-specific capability state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NurseInfo {
    registration_number: String,
    shift_details: String,
    pub(crate) assisting: Option<AppointmentId>,
}

impl Default for NurseInfo {
    fn default() -> Self {
        Self {
            registration_number: "00000".to_string(),
            shift_details: "N/A".to_string(),
            assisting: None,
        }
    }
}

impl NurseInfo {
    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    pub fn shift_details(&self) -> &str {
        &self.shift_details
    }

    /// The one appointment this nurse currently assists, if any.
    pub fn assisting(&self) -> Option<AppointmentId> {
        self.assisting
    }
}

/// Employee capability block shared by doctors and nurses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeInfo {
    pub(crate) kind: EmployeeKind,
    salary: f64,
    pub(crate) department: Option<DepartmentId>,
    pub(crate) doctor: Option<DoctorInfo>,
    pub(crate) nurse: Option<NurseInfo>,
    pub(crate) participations: Vec<ParticipationId>,
}

impl EmployeeInfo {
    pub(crate) fn new(kind: EmployeeKind, salary: f64) -> Self {
        Self {
            kind,
            salary,
            department: None,
            doctor: (kind == EmployeeKind::Doctor).then(DoctorInfo::default),
            nurse: (kind == EmployeeKind::Nurse).then(NurseInfo::default),
            participations: Vec::new(),
        }
    }

    pub fn kind(&self) -> EmployeeKind {
        self.kind
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }

    pub fn department(&self) -> Option<DepartmentId> {
        self.department
    }

    pub fn participations(&self) -> &[ParticipationId] {
        &self.participations
    }
}

/// Patient capability block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientInfo {
    pub(crate) responsible_doctor: PersonId,
    pub(crate) record: MedicalRecordId,
    pub(crate) appointments: Vec<AppointmentId>,
    pub(crate) surgeries: Vec<SurgeryId>,
    pub(crate) admissions: Vec<RoomAssignmentId>,
    middle_name: Option<String>,
    allergies: Vec<String>,
}

impl PatientInfo {
    pub(crate) fn new(responsible_doctor: PersonId, record: MedicalRecordId) -> Self {
        Self {
            responsible_doctor,
            record,
            appointments: Vec::new(),
            surgeries: Vec::new(),
            admissions: Vec::new(),
            middle_name: None,
            allergies: Vec::new(),
        }
    }

    pub fn responsible_doctor(&self) -> PersonId {
        self.responsible_doctor
    }

    pub fn record(&self) -> MedicalRecordId {
        self.record
    }

    pub fn appointments(&self) -> &[AppointmentId] {
        &self.appointments
    }

    pub fn surgeries(&self) -> &[SurgeryId] {
        &self.surgeries
    }

    pub fn admissions(&self) -> &[RoomAssignmentId] {
        &self.admissions
    }

    pub fn middle_name(&self) -> Option<&str> {
        self.middle_name.as_deref()
    }

    pub fn allergies(&self) -> &[String] {
        &self.allergies
    }
}

/// A person in the hospital graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    id: PersonId,
    name: String,
    surname: String,
    national_id: String,
    gender: String,
    phone_number: String,
    date_of_birth: NaiveDate,
    pub(crate) address: AddressId,
    pub(crate) patient: Option<PatientInfo>,
    pub(crate) employee: Option<EmployeeInfo>,
}

/// Input for `Hospital::register_person`.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub name: String,
    pub surname: String,
    pub national_id: String,
    pub gender: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
}

impl NewPerson {
    pub(crate) fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("surname", &self.surname)?;
        require_text("national id", &self.national_id)?;
        require_text("gender", &self.gender)?;
        require_text("phone number", &self.phone_number)?;
        if self.date_of_birth > Utc::now().date_naive() {
            return Err(HospitalError::validation(
                "date of birth cannot be in the future",
            ));
        }
        Ok(())
    }
}

impl Person {
    /// Build from pre-validated input; registration wires the address.
    pub(crate) fn from_parts(id: PersonId, address: AddressId, new: NewPerson) -> Self {
        Self {
            id,
            name: new.name,
            surname: new.surname,
            national_id: new.national_id,
            gender: new.gender,
            phone_number: new.phone_number,
            date_of_birth: new.date_of_birth,
            address,
            patient: None,
            employee: None,
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn address(&self) -> AddressId {
        self.address
    }

    /// Age in whole years, derived from the date of birth. Never stored.
    pub fn age(&self) -> i32 {
        let today = Utc::now().date_naive();
        let mut age = today.year() - self.date_of_birth.year();
        if (today.month(), today.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age
    }

    pub fn set_name(&mut self, value: &str) -> Result<()> {
        require_text("name", value)?;
        self.name = value.to_string();
        Ok(())
    }

    pub fn set_surname(&mut self, value: &str) -> Result<()> {
        require_text("surname", value)?;
        self.surname = value.to_string();
        Ok(())
    }

    pub fn set_gender(&mut self, value: &str) -> Result<()> {
        require_text("gender", value)?;
        self.gender = value.to_string();
        Ok(())
    }

    pub fn set_phone_number(&mut self, value: &str) -> Result<()> {
        require_text("phone number", value)?;
        self.phone_number = value.to_string();
        Ok(())
    }

    pub fn set_date_of_birth(&mut self, value: NaiveDate) -> Result<()> {
        if value > Utc::now().date_naive() {
            return Err(HospitalError::validation(
                "date of birth cannot be in the future",
            ));
        }
        self.date_of_birth = value;
        Ok(())
    }

    // ─── capability queries ──────────────────────────────────────────────

    pub fn is_patient(&self) -> bool {
        self.patient.is_some()
    }

    pub fn is_employee(&self) -> bool {
        self.employee.is_some()
    }

    pub fn is_doctor(&self) -> bool {
        matches!(&self.employee, Some(info) if info.kind == EmployeeKind::Doctor)
    }

    pub fn is_nurse(&self) -> bool {
        matches!(&self.employee, Some(info) if info.kind == EmployeeKind::Nurse)
    }

    pub fn patient_info(&self) -> Result<&PatientInfo> {
        self.patient
            .as_ref()
            .ok_or_else(|| HospitalError::capability("person is not a patient"))
    }

    pub(crate) fn patient_info_mut(&mut self) -> Result<&mut PatientInfo> {
        self.patient
            .as_mut()
            .ok_or_else(|| HospitalError::capability("person is not a patient"))
    }

    pub fn employee_info(&self) -> Result<&EmployeeInfo> {
        self.employee
            .as_ref()
            .ok_or_else(|| HospitalError::capability("person is not an employee"))
    }

    pub(crate) fn employee_info_mut(&mut self) -> Result<&mut EmployeeInfo> {
        self.employee
            .as_mut()
            .ok_or_else(|| HospitalError::capability("person is not an employee"))
    }

    pub fn doctor_info(&self) -> Result<&DoctorInfo> {
        self.employee_info()?
            .doctor
            .as_ref()
            .ok_or_else(|| HospitalError::capability("person is not a doctor"))
    }

    pub(crate) fn doctor_info_mut(&mut self) -> Result<&mut DoctorInfo> {
        self.employee_info_mut()?
            .doctor
            .as_mut()
            .ok_or_else(|| HospitalError::capability("person is not a doctor"))
    }

    pub fn nurse_info(&self) -> Result<&NurseInfo> {
        self.employee_info()?
            .nurse
            .as_ref()
            .ok_or_else(|| HospitalError::capability("person is not a nurse"))
    }

    pub(crate) fn nurse_info_mut(&mut self) -> Result<&mut NurseInfo> {
        self.employee_info_mut()?
            .nurse
            .as_mut()
            .ok_or_else(|| HospitalError::capability("person is not a nurse"))
    }

    // ─── capability-gated setters ────────────────────────────────────────

    pub fn set_salary(&mut self, salary: f64) -> Result<()> {
        if salary < 0.0 {
            return Err(HospitalError::validation("salary cannot be negative"));
        }
        self.employee_info_mut()?.salary = salary;
        Ok(())
    }

    pub fn set_specialization(&mut self, value: &str) -> Result<()> {
        require_text("specialization", value)?;
        self.doctor_info_mut()?.specialization = value.to_string();
        Ok(())
    }

    pub fn set_license_number(&mut self, value: &str) -> Result<()> {
        require_text("license number", value)?;
        self.doctor_info_mut()?.license_number = value.to_string();
        Ok(())
    }

    pub fn set_doctor_roles(&mut self, roles: DoctorRoles) -> Result<()> {
        self.doctor_info_mut()?.roles = roles;
        Ok(())
    }

    /// Set the employment terms. Contractors must have an end date, and an
    /// end date never precedes the start.
    pub fn set_doctor_employment(
        &mut self,
        kind: EmploymentKind,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<()> {
        if let Some(end) = end {
            if end < start {
                return Err(HospitalError::validation(
                    "employment end date cannot precede the start date",
                ));
            }
        }
        if kind == EmploymentKind::Contractor && end.is_none() {
            return Err(HospitalError::validation(
                "contractor employment requires an end date",
            ));
        }
        self.doctor_info_mut()?.employment = Some(Employment { kind, start, end });
        Ok(())
    }

    /// Valid only while the doctor holds the Consultant role.
    pub fn set_consulting_hours(&mut self, value: &str) -> Result<()> {
        require_text("consulting hours", value)?;
        let info = self.doctor_info_mut()?;
        if !info.roles.consultant {
            return Err(HospitalError::capability(
                "doctor does not hold the consultant role",
            ));
        }
        info.consulting_hours = Some(value.to_string());
        Ok(())
    }

    /// Valid only while the doctor holds the Surgeon role.
    pub fn set_surgeon_speciality(&mut self, value: &str) -> Result<()> {
        require_text("surgeon speciality", value)?;
        let info = self.doctor_info_mut()?;
        if !info.roles.surgeon {
            return Err(HospitalError::capability(
                "doctor does not hold the surgeon role",
            ));
        }
        info.surgeon_speciality = Some(value.to_string());
        Ok(())
    }

    pub fn set_registration_number(&mut self, value: &str) -> Result<()> {
        require_text("registration number", value)?;
        self.nurse_info_mut()?.registration_number = value.to_string();
        Ok(())
    }

    pub fn set_shift_details(&mut self, value: &str) -> Result<()> {
        require_text("shift details", value)?;
        self.nurse_info_mut()?.shift_details = value.to_string();
        Ok(())
    }

    /// `None` clears the middle name; a whitespace-only value is rejected.
    pub fn set_middle_name(&mut self, value: Option<&str>) -> Result<()> {
        if let Some(value) = value {
            require_text("middle name", value)?;
        }
        self.patient_info_mut()?.middle_name = value.map(str::to_string);
        Ok(())
    }

    /// Adding an allergy the patient already has is a no-op.
    pub fn add_allergy(&mut self, value: &str) -> Result<()> {
        require_text("allergy", value)?;
        let info = self.patient_info_mut()?;
        if !info.allergies.iter().any(|a| a == value) {
            info.allergies.push(value.to_string());
        }
        Ok(())
    }
}
