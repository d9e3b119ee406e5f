//! Department membership, headship, and the room composition.

use super::Hospital;
use crate::error::{ConstraintViolation, Result};
use crate::ids::{DepartmentId, PersonId, RoomId};
use crate::models::{NewRoom, Room};

impl Hospital {
    /// Link an existing employee into a department, qualified by national ID.
    /// A person already employed by a different department must be detached
    /// first; re-linking the same department is a no-op.
    pub fn assign_department(&mut self, person: PersonId, department: DepartmentId) -> Result<()> {
        match self.person(person)?.employee_info()?.department() {
            Some(current) if current == department => return Ok(()),
            Some(_) => return Err(ConstraintViolation::AlreadyEmployed.into()),
            None => {}
        }
        let national_id = self.person(person)?.national_id().to_string();
        match self.department(department)?.employee_by_id(&national_id) {
            Some(existing) if existing != person => {
                return Err(ConstraintViolation::EmployeeIdTaken(national_id).into());
            }
            _ => {}
        }

        if let Some(entry) = self.people.get_mut(person) {
            if let Ok(info) = entry.employee_info_mut() {
                info.department = Some(department);
            }
        }
        if let Some(entry) = self.departments.get_mut(department) {
            entry.employees.insert(national_id, person);
            entry.total_employees += 1;
        }
        Ok(())
    }

    /// Qualified removal: a no-op unless this department currently maps the
    /// person's national ID to exactly this person. Headship is left alone;
    /// head validity is checked at assignment time only.
    pub fn remove_employee(&mut self, department: DepartmentId, person: PersonId) -> Result<()> {
        let national_id = self.person(person)?.national_id().to_string();
        if self.department(department)?.employee_by_id(&national_id) != Some(person) {
            return Ok(());
        }

        if let Some(entry) = self.departments.get_mut(department) {
            entry.employees.remove(&national_id);
            entry.total_employees = entry.total_employees.saturating_sub(1);
        }
        if let Some(entry) = self.people.get_mut(person) {
            if let Ok(info) = entry.employee_info_mut() {
                if info.department == Some(department) {
                    info.department = None;
                }
            }
        }
        Ok(())
    }

    /// Appoint a department head: a permanent doctor, currently an employee
    /// of this department, heading nowhere else. Replaces the previous head.
    pub fn set_head(&mut self, department: DepartmentId, doctor: PersonId) -> Result<()> {
        let info = self.person(doctor)?.doctor_info()?;
        match info.heads() {
            Some(current) if current == department => return Ok(()),
            Some(_) => return Err(ConstraintViolation::AlreadyHeadsDepartment.into()),
            None => {}
        }
        if !info.is_permanent() {
            return Err(ConstraintViolation::HeadNotPermanent.into());
        }
        let national_id = self.person(doctor)?.national_id().to_string();
        if self.department(department)?.employee_by_id(&national_id) != Some(doctor) {
            return Err(ConstraintViolation::HeadNotEmployee.into());
        }

        let previous = self.department(department)?.head();
        if let Some(previous) = previous {
            if let Some(entry) = self.people.get_mut(previous) {
                if let Ok(info) = entry.doctor_info_mut() {
                    info.heads = None;
                }
            }
        }
        if let Some(entry) = self.departments.get_mut(department) {
            entry.head = Some(doctor);
        }
        if let Some(entry) = self.people.get_mut(doctor) {
            if let Ok(info) = entry.doctor_info_mut() {
                info.heads = Some(department);
            }
        }
        tracing::debug!(
            department = department.raw(),
            head = doctor.raw(),
            "appointed department head"
        );
        Ok(())
    }

    /// Clear the headship link on both ends. No-op when no head is set.
    pub fn clear_head(&mut self, department: DepartmentId) -> Result<()> {
        let Some(head) = self.department(department)?.head() else {
            return Ok(());
        };
        if let Some(entry) = self.departments.get_mut(department) {
            entry.head = None;
        }
        if let Some(entry) = self.people.get_mut(head) {
            if let Ok(info) = entry.doctor_info_mut() {
                info.heads = None;
            }
        }
        Ok(())
    }

    // ─── room composition ────────────────────────────────────────────────

    /// Create a room inside a department. Rooms only come into existence
    /// through their owning department.
    pub fn create_room(&mut self, department: DepartmentId, new: NewRoom) -> Result<RoomId> {
        self.department(department)?;
        new.validate()?;
        let room = self
            .rooms
            .alloc(|id| Room::from_parts(id, department, new));
        if let Some(entry) = self.departments.get_mut(department) {
            entry.rooms.push(room);
        }
        tracing::debug!(room = room.raw(), department = department.raw(), "created room");
        Ok(room)
    }

    /// Remove a room from its department AND from the global registry, along
    /// with its assignments: owned entities do not outlive their owner.
    pub fn remove_room(&mut self, department: DepartmentId, room: RoomId) -> Result<()> {
        self.department(department)?;
        let Some(entry) = self.rooms.get(room) else {
            return Ok(());
        };
        if entry.department() != department {
            return Ok(());
        }
        let assignments = entry.assignments().to_vec();

        if let Some(entry) = self.departments.get_mut(department) {
            entry.rooms.retain(|r| *r != room);
        }
        for assignment in assignments {
            if let Some(removed) = self.assignments.remove(assignment) {
                if let Some(patient) = self.people.get_mut(removed.patient()) {
                    if let Ok(info) = patient.patient_info_mut() {
                        info.admissions.retain(|a| *a != assignment);
                    }
                }
            }
        }
        self.rooms.remove(room);
        tracing::debug!(room = room.raw(), department = department.raw(), "removed room");
        Ok(())
    }

    /// Derived: active assignments have reached capacity.
    pub fn room_is_full(&self, room: RoomId) -> Result<bool> {
        let room = self.room(room)?;
        let active = room
            .assignments()
            .iter()
            .filter_map(|id| self.assignments.get(*id))
            .filter(|a| a.is_active())
            .count();
        Ok(active >= room.capacity() as usize)
    }

    /// Derived: not full and not out of service. Never stored.
    pub fn room_is_available(&self, room: RoomId) -> Result<bool> {
        Ok(!self.room_is_full(room)? && !self.room(room)?.is_out_of_service())
    }
}
