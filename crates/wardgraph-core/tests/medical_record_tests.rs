//! The medical record "history hub": ownership, completion outputs, and the
//! chronological merge across record kinds.

use chrono::{Duration, NaiveDate, Utc};

use wardgraph_core::{
    ConstraintViolation, DepartmentId, DoctorRoles, EmployeeKind, EmploymentKind, HistoryEntry,
    Hospital, HospitalError, NewPerson, PersonId,
};

fn make_doctor(hospital: &mut Hospital, department: DepartmentId, nid: &str) -> PersonId {
    let doctor = hospital
        .register_person(NewPerson {
            name: "Doc".into(),
            surname: "One".into(),
            national_id: nid.into(),
            gender: "F".into(),
            phone_number: "123".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1975, 3, 1).unwrap(),
        })
        .unwrap();
    hospital
        .grant_employee(doctor, EmployeeKind::Doctor, department, 10_000.0)
        .unwrap();
    hospital
        .person_mut(doctor)
        .unwrap()
        .set_doctor_roles(DoctorRoles::all())
        .unwrap();
    hospital
        .person_mut(doctor)
        .unwrap()
        .set_doctor_employment(
            EmploymentKind::Permanent,
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            None,
        )
        .unwrap();
    doctor
}

fn make_patient(hospital: &mut Hospital, doctor: PersonId, nid: &str) -> PersonId {
    let patient = hospital
        .register_person(NewPerson {
            name: "Pat".into(),
            surname: "One".into(),
            national_id: nid.into(),
            gender: "M".into(),
            phone_number: "999".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        })
        .unwrap();
    hospital.grant_patient(patient, doctor).unwrap();
    patient
}

#[test]
fn granting_the_patient_capability_creates_the_record() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, doctor, "P1");

    let record = hospital.person(patient).unwrap().patient_info().unwrap().record();
    assert_eq!(hospital.medical_record(record).unwrap().patient(), patient);
}

#[test]
fn history_merges_record_kinds_in_time_order() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, doctor, "P1");
    let now = Utc::now();

    let diagnosis = hospital
        .record_diagnosis(patient, "Influenza", now - Duration::days(1))
        .unwrap();
    let consultation = hospital
        .record_consultation(patient, now - Duration::hours(1), "Checkup")
        .unwrap();
    let appointment = hospital
        .schedule_appointment(patient, doctor, now + Duration::hours(1))
        .unwrap();
    let surgery = hospital
        .schedule_surgery(patient, doctor, "Appendectomy", now + Duration::hours(2), 60)
        .unwrap();

    let history: Vec<_> = hospital.patient_history(patient).unwrap().collect();
    assert_eq!(
        history,
        vec![
            HistoryEntry::Diagnosis(diagnosis),
            HistoryEntry::Consultation(consultation),
            HistoryEntry::Appointment(appointment),
            HistoryEntry::Surgery(surgery),
        ]
    );

    // restartable: a second walk yields the same sequence
    let again: Vec<_> = hospital.patient_history(patient).unwrap().collect();
    assert_eq!(again, history);
}

#[test]
fn completing_an_appointment_creates_cross_linked_outputs() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, doctor, "P1");
    let time = Utc::now() + Duration::days(1);
    let appointment = hospital.schedule_appointment(patient, doctor, time).unwrap();

    let consultation = hospital
        .complete_appointment(
            appointment,
            "Discussed symptoms",
            Some("Common Flu"),
            Some("Paracetamol"),
            Some("500mg"),
        )
        .unwrap();

    let entry = hospital.appointment(appointment).unwrap();
    assert!(entry.is_completed());
    assert_eq!(entry.consultation(), Some(consultation));
    let diagnosis = entry.diagnosis().expect("diagnosis created");
    let prescription = entry.prescription().expect("prescription created");

    let record = hospital.person(patient).unwrap().patient_info().unwrap().record();
    let record = hospital.medical_record(record).unwrap();
    assert_eq!(record.consultations(), [consultation]);
    assert_eq!(record.diagnoses(), [diagnosis]);
    assert_eq!(record.prescriptions(), [prescription]);

    let consultation_entry = hospital.consultation(consultation).unwrap();
    assert_eq!(consultation_entry.source_appointment(), Some(appointment));
    assert_eq!(consultation_entry.notes(), "Discussed symptoms");
    assert_eq!(consultation_entry.diagnoses(), [diagnosis]);
    assert_eq!(consultation_entry.prescriptions(), [prescription]);

    let diagnosis_entry = hospital.diagnosis(diagnosis).unwrap();
    assert_eq!(diagnosis_entry.description(), "Common Flu");
    assert_eq!(diagnosis_entry.consultation(), Some(consultation));
    assert_eq!(diagnosis_entry.source_appointment(), Some(appointment));

    let prescription_entry = hospital.prescription(prescription).unwrap();
    assert_eq!(prescription_entry.medication(), "Paracetamol");
    assert_eq!(prescription_entry.dosage(), "500mg");
    assert_eq!(prescription_entry.consultation(), Some(consultation));
    assert_eq!(prescription_entry.source_appointment(), Some(appointment));
}

#[test]
fn completion_without_medication_skips_the_prescription() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, doctor, "P1");
    let time = Utc::now() + Duration::days(1);
    let appointment = hospital.schedule_appointment(patient, doctor, time).unwrap();

    hospital
        .complete_appointment(appointment, "Notes", Some("Common Flu"), None, None)
        .unwrap();

    let entry = hospital.appointment(appointment).unwrap();
    assert!(entry.diagnosis().is_some());
    assert!(entry.prescription().is_none());
    assert_eq!(hospital.prescriptions().count(), 0);

    // dosage without medication is not enough either
    let other = hospital
        .schedule_appointment(patient, doctor, time + Duration::hours(1))
        .unwrap();
    hospital
        .complete_appointment(other, "Notes", None, None, Some("500mg"))
        .unwrap();
    assert!(hospital.appointment(other).unwrap().prescription().is_none());
    assert!(hospital.appointment(other).unwrap().diagnosis().is_none());
}

#[test]
fn completed_appointments_are_terminal() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, doctor, "P1");
    let time = Utc::now() + Duration::days(1);
    let appointment = hospital.schedule_appointment(patient, doctor, time).unwrap();

    hospital
        .complete_appointment(appointment, "Notes", None, None, None)
        .unwrap();
    let err = hospital
        .complete_appointment(appointment, "Again", Some("Flu"), None, None)
        .unwrap_err();
    assert_eq!(
        err,
        HospitalError::Constraint(ConstraintViolation::AlreadyCompleted)
    );
    // exactly the one consultation from the first completion
    assert_eq!(hospital.consultations().count(), 1);
}
