//! Wardgraph Core Library
//!
//! An in-memory hospital object graph with a relationship-integrity engine:
//! every association is kept bidirectionally correct, multiplicity and
//! exclusivity rules are checked before a link commits, owned sub-entities
//! are destroyed by their owner, and a patient's history is derived across
//! five record types.
//!
//! # Architecture
//!
//! ```text
//!                      ┌───────────────────────────┐
//!   clients ─────────► │   Hospital (graph ops)    │
//!                      │  capability grants        │
//!                      │  association manager      │
//!                      │  constraint layer         │
//!                      │  composition lifecycle    │
//!                      │  history aggregator       │
//!                      └───────┬───────────┬───────┘
//!                              │           │
//!                      ┌───────▼───┐   ┌───▼───────┐
//!                      │  models   │   │  extents  │
//!                      │ (typed,   │   │ (per-type │
//!                      │ validated)│   │ registry) │
//!                      └───────────┘   └───────────┘
//! ```
//!
//! Single-threaded and synchronous: every operation either fully commits a
//! consistent mutation or fully rejects it. Relationship fields are only ever
//! touched by `Hospital` operations, never by independent field assignment.
//!
//! # Modules
//!
//! - [`graph`]: the `Hospital` context and every relationship operation
//! - [`models`]: domain types with self-validating scalar fields
//! - [`extent`]: insertion-ordered per-type registries
//! - [`ids`]: phantom-typed arena handles
//! - [`error`]: the four-kind error taxonomy

pub mod error;
pub mod extent;
pub mod graph;
pub mod ids;
pub mod models;

// Re-export commonly used types
pub use error::{ConstraintViolation, HospitalError, Result};
pub use graph::{HistoryEntry, Hospital};
pub use ids::{
    AddressId, AppointmentId, ConsultationId, DepartmentId, DiagnosisId, MedicalRecordId,
    ParticipationId, PersonId, PrescriptionId, RoomAssignmentId, RoomId, SurgeryId,
};
pub use models::{
    Address, Appointment, AppointmentStatus, Consultation, Department, Diagnosis, DoctorRoles,
    EmployeeKind, Employment, EmploymentKind, MedicalRecord, NewAddress, NewPerson, NewRoom,
    Person, Prescription, Room, RoomAssignment, Surgery, SurgeryStaffParticipation,
};
