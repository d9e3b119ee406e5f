//! Typed handles into the per-entity registries.
//!
//! Entity identity is the handle, not the value: two structurally equal
//! records registered separately get distinct handles, and a handle stays
//! stale forever once its entity is removed.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{
    Address, Appointment, Consultation, Department, Diagnosis, MedicalRecord, Person,
    Prescription, Room, RoomAssignment, Surgery, SurgeryStaffParticipation,
};

pub type PersonId = Id<Person>;
pub type AddressId = Id<Address>;
pub type DepartmentId = Id<Department>;
pub type RoomId = Id<Room>;
pub type RoomAssignmentId = Id<RoomAssignment>;
pub type AppointmentId = Id<Appointment>;
pub type SurgeryId = Id<Surgery>;
pub type ParticipationId = Id<SurgeryStaffParticipation>;
pub type MedicalRecordId = Id<MedicalRecord>;
pub type ConsultationId = Id<Consultation>;
pub type DiagnosisId = Id<Diagnosis>;
pub type PrescriptionId = Id<Prescription>;

/// Opaque arena handle for one entity type.
pub struct Id<T> {
    raw: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// The raw index. Only meaningful inside the registry that issued it.
    pub fn raw(self) -> u64 {
        self.raw
    }
}

// Manual impls: derives would demand the same bounds of `T`, which is only a
// phantom marker here.

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.raw)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.raw)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_compare_by_raw_value() {
        let a: PersonId = Id::from_raw(1);
        let b: PersonId = Id::from_raw(1);
        let c: PersonId = Id::from_raw(2);
        assert_eq!(a, b);
        assert!(a < c);
    }

    #[test]
    fn handles_serialize_as_plain_integers() {
        let id: RoomId = Id::from_raw(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: RoomId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }
}
