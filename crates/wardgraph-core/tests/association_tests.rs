//! Association integrity integration tests.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use wardgraph_core::{
    ConstraintViolation, DepartmentId, DoctorRoles, EmployeeKind, EmploymentKind, Hospital,
    HospitalError, NewAddress, NewPerson, NewRoom, PersonId, RoomId,
};

fn make_person(hospital: &mut Hospital, nid: &str) -> PersonId {
    hospital
        .register_person(NewPerson {
            name: "Test".into(),
            surname: "Person".into(),
            national_id: nid.into(),
            gender: "X".into(),
            phone_number: "555-0100".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
        })
        .unwrap()
}

fn make_doctor(hospital: &mut Hospital, department: DepartmentId, nid: &str) -> PersonId {
    let doctor = make_person(hospital, nid);
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
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            None,
        )
        .unwrap();
    doctor
}

fn make_nurse(hospital: &mut Hospital, department: DepartmentId, nid: &str) -> PersonId {
    let nurse = make_person(hospital, nid);
    hospital
        .grant_employee(nurse, EmployeeKind::Nurse, department, 6_000.0)
        .unwrap();
    nurse
}

fn make_patient(hospital: &mut Hospital, doctor: PersonId, nid: &str) -> PersonId {
    let patient = make_person(hospital, nid);
    hospital.grant_patient(patient, doctor).unwrap();
    patient
}

fn make_room(hospital: &mut Hospital, department: DepartmentId, number: &str, capacity: u32) -> RoomId {
    hospital
        .create_room(
            department,
            NewRoom {
                number: number.into(),
                kind: "Ward".into(),
                capacity,
            },
        )
        .unwrap()
}

#[test]
fn responsible_doctor_link_is_bidirectional_and_exclusive() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let doctor2 = make_doctor(&mut hospital, department, "D2");
    let patient = make_patient(&mut hospital, doctor, "P1");

    let info = hospital.person(patient).unwrap().patient_info().unwrap();
    assert_eq!(info.responsible_doctor(), doctor);
    assert!(hospital
        .person(doctor)
        .unwrap()
        .doctor_info()
        .unwrap()
        .patients()
        .contains(&patient));

    hospital.set_responsible_doctor(patient, doctor2).unwrap();

    assert!(!hospital
        .person(doctor)
        .unwrap()
        .doctor_info()
        .unwrap()
        .patients()
        .contains(&patient));
    assert!(hospital
        .person(doctor2)
        .unwrap()
        .doctor_info()
        .unwrap()
        .patients()
        .contains(&patient));
}

#[test]
fn doctor_appointments_are_a_qualified_association() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, doctor, "P1");
    let time = Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap();

    let appointment = hospital.schedule_appointment(patient, doctor, time).unwrap();

    let conducted = hospital.person(doctor).unwrap().doctor_info().unwrap().conducted().clone();
    assert_eq!(conducted.get(&time), Some(&appointment));
}

#[test]
fn double_booking_is_rejected_and_leaves_the_map_intact() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, doctor, "P1");
    let other_patient = make_patient(&mut hospital, doctor, "P2");
    let time = Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap();

    let first = hospital.schedule_appointment(patient, doctor, time).unwrap();
    let err = hospital
        .schedule_appointment(other_patient, doctor, time)
        .unwrap_err();

    assert_eq!(
        err,
        HospitalError::Constraint(ConstraintViolation::DoubleBooking(time))
    );
    let info = hospital.person(doctor).unwrap().doctor_info().unwrap();
    assert_eq!(info.conducted().len(), 1);
    assert_eq!(info.conducted().get(&time), Some(&first));
    // the rejected patient's side is untouched too
    assert!(hospital
        .person(other_patient)
        .unwrap()
        .patient_info()
        .unwrap()
        .appointments()
        .is_empty());
}

#[test]
fn conducted_appointments_are_per_doctor() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor1 = make_doctor(&mut hospital, department, "D1");
    let doctor2 = make_doctor(&mut hospital, department, "D2");
    let patient = make_patient(&mut hospital, doctor1, "P1");
    let time = Utc.with_ymd_and_hms(2030, 5, 5, 10, 0, 0).unwrap();

    hospital.schedule_appointment(patient, doctor1, time).unwrap();

    assert_eq!(hospital.person(doctor1).unwrap().doctor_info().unwrap().conducted().len(), 1);
    assert_eq!(hospital.person(doctor2).unwrap().doctor_info().unwrap().conducted().len(), 0);
}

#[test]
fn department_employees_are_keyed_by_national_id() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "DOC123");

    let found = hospital.department(department).unwrap().employee_by_id("DOC123");
    assert_eq!(found, Some(doctor));
    assert_eq!(hospital.department(department).unwrap().total_employees(), 1);

    // membership is mirrored on the employee
    assert_eq!(
        hospital.person(doctor).unwrap().employee_info().unwrap().department(),
        Some(department)
    );
}

#[test]
fn department_transfer_requires_explicit_detach() {
    let mut hospital = Hospital::new();
    let cardiology = hospital.register_department("Cardiology", "Floor 2").unwrap();
    let neurology = hospital.register_department("Neurology", "Floor 3").unwrap();
    let doctor = make_doctor(&mut hospital, cardiology, "D1");

    let err = hospital.assign_department(doctor, neurology).unwrap_err();
    assert_eq!(
        err,
        HospitalError::Constraint(ConstraintViolation::AlreadyEmployed)
    );

    hospital.remove_employee(cardiology, doctor).unwrap();
    assert_eq!(hospital.department(cardiology).unwrap().total_employees(), 0);
    assert!(hospital.person(doctor).unwrap().employee_info().unwrap().department().is_none());

    hospital.assign_department(doctor, neurology).unwrap();
    assert_eq!(
        hospital.department(neurology).unwrap().employee_by_id("D1"),
        Some(doctor)
    );

    // re-linking the same department is a no-op, not a second membership
    hospital.assign_department(doctor, neurology).unwrap();
    assert_eq!(hospital.department(neurology).unwrap().total_employees(), 1);
}

#[test]
fn cancelling_an_appointment_unlinks_both_ends() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let nurse = make_nurse(&mut hospital, department, "N1");
    let patient = make_patient(&mut hospital, doctor, "P1");
    let time = Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap();

    let appointment = hospital.schedule_appointment(patient, doctor, time).unwrap();
    hospital.add_assisting_nurse(appointment, nurse).unwrap();

    hospital.cancel_appointment(appointment).unwrap();

    assert!(hospital.appointment(appointment).is_err());
    assert!(hospital.person(doctor).unwrap().doctor_info().unwrap().conducted().is_empty());
    assert!(hospital.person(patient).unwrap().patient_info().unwrap().appointments().is_empty());
    assert!(hospital.person(nurse).unwrap().nurse_info().unwrap().assisting().is_none());

    // the slot is free again
    hospital.schedule_appointment(patient, doctor, time).unwrap();
}

#[test]
fn nurse_assists_one_appointment_at_a_time() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let nurse = make_nurse(&mut hospital, department, "N1");
    let patient = make_patient(&mut hospital, doctor, "P1");

    let t1 = Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2030, 1, 2, 10, 0, 0).unwrap();
    let first = hospital.schedule_appointment(patient, doctor, t1).unwrap();
    let second = hospital.schedule_appointment(patient, doctor, t2).unwrap();

    hospital.add_assisting_nurse(first, nurse).unwrap();
    assert_eq!(
        hospital.person(nurse).unwrap().nurse_info().unwrap().assisting(),
        Some(first)
    );
    assert!(hospital.appointment(first).unwrap().assisting_nurses().contains(&nurse));

    // re-adding the same link is a no-op
    hospital.add_assisting_nurse(first, nurse).unwrap();
    assert_eq!(hospital.appointment(first).unwrap().assisting_nurses().len(), 1);

    let err = hospital.add_assisting_nurse(second, nurse).unwrap_err();
    assert_eq!(
        err,
        HospitalError::Constraint(ConstraintViolation::NurseOccupied)
    );

    hospital.remove_assisting_nurse(first, nurse).unwrap();
    assert!(hospital.person(nurse).unwrap().nurse_info().unwrap().assisting().is_none());
    assert!(hospital.appointment(first).unwrap().assisting_nurses().is_empty());
    hospital.add_assisting_nurse(second, nurse).unwrap();
}

#[test]
fn department_head_must_be_a_permanent_employee_here() {
    let mut hospital = Hospital::new();
    let cardiology = hospital.register_department("Cardiology", "Floor 2").unwrap();
    let neurology = hospital.register_department("Neurology", "Floor 3").unwrap();
    let head = make_doctor(&mut hospital, cardiology, "D1");

    hospital.set_head(cardiology, head).unwrap();
    assert_eq!(hospital.department(cardiology).unwrap().head(), Some(head));
    assert_eq!(
        hospital.person(head).unwrap().doctor_info().unwrap().heads(),
        Some(cardiology)
    );

    // move departments without giving up the headship
    hospital.remove_employee(cardiology, head).unwrap();
    hospital.assign_department(head, neurology).unwrap();

    let err = hospital.set_head(neurology, head).unwrap_err();
    assert_eq!(
        err,
        HospitalError::Constraint(ConstraintViolation::AlreadyHeadsDepartment)
    );

    hospital.clear_head(cardiology).unwrap();
    hospital.set_head(neurology, head).unwrap();
    assert_eq!(hospital.department(neurology).unwrap().head(), Some(head));
}

#[test]
fn head_candidates_need_permanent_employment() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_person(&mut hospital, "D1");
    hospital
        .grant_employee(doctor, EmployeeKind::Doctor, department, 8_000.0)
        .unwrap();

    // no employment terms at all
    let err = hospital.set_head(department, doctor).unwrap_err();
    assert_eq!(
        err,
        HospitalError::Constraint(ConstraintViolation::HeadNotPermanent)
    );

    hospital
        .person_mut(doctor)
        .unwrap()
        .set_doctor_employment(
            EmploymentKind::Contractor,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
        )
        .unwrap();
    assert!(hospital.set_head(department, doctor).is_err());
}

#[test]
fn person_address_link_is_exclusive() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("General", "Floor 1").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, doctor, "P1");

    let placeholder = hospital.person(patient).unwrap().address();
    let address = hospital
        .register_address(NewAddress {
            country: "PL".into(),
            city: "Warsaw".into(),
            street: "Main 5".into(),
            ..NewAddress::default()
        })
        .unwrap();

    hospital.set_address(patient, address).unwrap();
    assert_eq!(hospital.person(patient).unwrap().address(), address);
    assert_eq!(hospital.address(address).unwrap().person(), Some(patient));
    // the placeholder's back-reference is cleared
    assert!(hospital.address(placeholder).unwrap().person().is_none());

    // same value in place: no-op
    hospital.set_address(patient, address).unwrap();

    // an address held by someone else cannot be stolen
    let err = hospital.set_address(doctor, address).unwrap_err();
    assert_eq!(
        err,
        HospitalError::Constraint(ConstraintViolation::AddressInUse)
    );
    assert_eq!(hospital.address(address).unwrap().person(), Some(patient));
}

#[test]
fn removing_a_room_strikes_it_from_the_global_registry() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("ICU", "Floor 4").unwrap();
    let room = make_room(&mut hospital, department, "101", 2);

    assert_eq!(hospital.rooms().count(), 1);
    assert_eq!(hospital.department(department).unwrap().rooms(), [room]);

    hospital.remove_room(department, room).unwrap();

    assert_eq!(hospital.rooms().count(), 0);
    assert!(hospital.department(department).unwrap().rooms().is_empty());
    assert!(hospital.room(room).is_err());
    // removal of a struck room is a no-op, not an error
    hospital.remove_room(department, room).unwrap();
}

#[test]
fn room_of_capacity_one_boundary() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("ICU", "Floor 4").unwrap();
    let doctor = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, doctor, "P1");
    let other = make_patient(&mut hospital, doctor, "P2");
    let room = make_room(&mut hospital, department, "101", 1);

    let admitted = Utc::now() - Duration::hours(1);
    let assignment = hospital.admit_patient(patient, room, admitted).unwrap();
    assert!(hospital.room_is_full(room).unwrap());
    assert!(!hospital.room_is_available(room).unwrap());

    let err = hospital.admit_patient(other, room, admitted).unwrap_err();
    assert_eq!(err, HospitalError::Constraint(ConstraintViolation::RoomFull));

    hospital.discharge_patient(assignment, Utc::now()).unwrap();
    assert!(!hospital.room_is_full(room).unwrap());
    hospital.admit_patient(other, room, Utc::now()).unwrap();
}

#[test]
fn active_surgery_blocks_admission() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("Surgery", "Floor 5").unwrap();
    let surgeon = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, surgeon, "P1");
    let room = make_room(&mut hospital, department, "201", 2);

    // zero duration: open-ended, so the surgery is active
    let surgery = hospital
        .schedule_surgery(patient, surgeon, "Appendectomy", Utc::now(), 0)
        .unwrap();
    assert!(hospital.surgery(surgery).unwrap().is_active());

    let err = hospital.admit_patient(patient, room, Utc::now()).unwrap_err();
    assert_eq!(
        err,
        HospitalError::Constraint(ConstraintViolation::ActiveSurgery)
    );
    assert!(hospital.surgery(surgery).unwrap().is_active());
    assert!(hospital.room(room).unwrap().assignments().is_empty());

    // ending the surgery unblocks admission
    hospital.set_surgery_duration(surgery, 45).unwrap();
    hospital.admit_patient(patient, room, Utc::now()).unwrap();
}

#[test]
fn active_admission_blocks_surgery() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("Surgery", "Floor 5").unwrap();
    let surgeon = make_doctor(&mut hospital, department, "D1");
    let patient = make_patient(&mut hospital, surgeon, "P1");
    let room = make_room(&mut hospital, department, "201", 2);

    hospital.admit_patient(patient, room, Utc::now()).unwrap();
    let err = hospital
        .schedule_surgery(patient, surgeon, "Appendectomy", Utc::now(), 60)
        .unwrap_err();
    assert_eq!(
        err,
        HospitalError::Constraint(ConstraintViolation::ActiveAdmission)
    );
    assert!(hospital.person(patient).unwrap().patient_info().unwrap().surgeries().is_empty());
}

#[test]
fn surgery_staff_participation_registers_on_both_ends() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("Surgery", "Floor 5").unwrap();
    let surgeon = make_doctor(&mut hospital, department, "D1");
    let nurse = make_nurse(&mut hospital, department, "N1");
    let patient = make_patient(&mut hospital, surgeon, "P1");

    let surgery = hospital
        .schedule_surgery(patient, surgeon, "Knee replacement", Utc::now(), 120)
        .unwrap();
    let participation = hospital.add_surgery_staff(surgery, nurse, "Assistant").unwrap();

    assert_eq!(hospital.surgery(surgery).unwrap().staff(), [participation]);
    assert_eq!(
        hospital.person(nurse).unwrap().employee_info().unwrap().participations(),
        [participation]
    );
    let join = hospital.participation(participation).unwrap();
    assert_eq!(join.surgery(), surgery);
    assert_eq!(join.staff_member(), nurse);
    assert_eq!(join.role(), "Assistant");

    // idempotent: the same pair yields the same join entity
    let again = hospital.add_surgery_staff(surgery, nurse, "Assistant").unwrap();
    assert_eq!(again, participation);
    assert_eq!(hospital.surgery(surgery).unwrap().staff().len(), 1);

    hospital.remove_surgery_staff(surgery, nurse).unwrap();
    assert!(hospital.surgery(surgery).unwrap().staff().is_empty());
    assert!(hospital.person(nurse).unwrap().employee_info().unwrap().participations().is_empty());
    assert!(hospital.participation(participation).is_err());
}

#[test]
fn surgeries_require_the_surgeon_role() {
    let mut hospital = Hospital::new();
    let department = hospital.register_department("Surgery", "Floor 5").unwrap();
    let doctor = make_person(&mut hospital, "D1");
    hospital
        .grant_employee(doctor, EmployeeKind::Doctor, department, 9_000.0)
        .unwrap();
    let patient = make_patient(&mut hospital, doctor, "P1");

    let err = hospital
        .schedule_surgery(patient, doctor, "Appendectomy", Utc::now(), 60)
        .unwrap_err();
    assert!(matches!(err, HospitalError::Capability(_)));
}

proptest! {
    /// Exclusive relink: after any sequence of responsible-doctor changes,
    /// the patient is referenced by exactly one doctor: the last assigned.
    #[test]
    fn responsible_doctor_relinks_stay_exclusive(
        sequence in proptest::collection::vec(0usize..3, 1..12)
    ) {
        let mut hospital = Hospital::new();
        let department = hospital.register_department("General", "Floor 1").unwrap();
        let doctors = [
            make_doctor(&mut hospital, department, "D0"),
            make_doctor(&mut hospital, department, "D1"),
            make_doctor(&mut hospital, department, "D2"),
        ];
        let patient = make_patient(&mut hospital, doctors[0], "P1");

        for &index in &sequence {
            hospital.set_responsible_doctor(patient, doctors[index]).unwrap();
        }

        let expected = doctors[*sequence.last().unwrap()];
        let holders = doctors
            .iter()
            .filter(|d| {
                hospital
                    .person(**d)
                    .unwrap()
                    .doctor_info()
                    .unwrap()
                    .patients()
                    .contains(&patient)
            })
            .count();
        prop_assert_eq!(holders, 1);
        prop_assert_eq!(
            hospital.person(patient).unwrap().patient_info().unwrap().responsible_doctor(),
            expected
        );
    }
}
