//! Flat JSON snapshot export for wardgraph extents.
//!
//! This is the "bulk persistence" collaborator of the core: per-entity-type
//! lists serialized as flat attribute state. It is an export, not a restore
//! path: reloading a list yields plain records, and re-establishing
//! cross-entity links, qualified maps and constraint state is the caller's
//! responsibility. The core never consumes these bytes to rebuild a graph.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use wardgraph_core::Hospital;

/// Snapshot errors.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Serialize one entity list to bytes.
pub fn save_all<T: Serialize>(items: &[T]) -> SnapshotResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(items)?)
}

/// Deserialize one entity list from bytes. Returns flat attribute state
/// only; handles inside the records refer to registries that no longer
/// exist until the caller relinks them.
pub fn load_all<T: DeserializeOwned>(bytes: &[u8]) -> SnapshotResult<Vec<T>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// One serialized blob per entity type, captured from a live graph.
#[derive(Debug, Clone)]
pub struct HospitalSnapshot {
    pub people: Vec<u8>,
    pub addresses: Vec<u8>,
    pub departments: Vec<u8>,
    pub rooms: Vec<u8>,
    pub assignments: Vec<u8>,
    pub appointments: Vec<u8>,
    pub surgeries: Vec<u8>,
    pub participations: Vec<u8>,
    pub medical_records: Vec<u8>,
    pub consultations: Vec<u8>,
    pub diagnoses: Vec<u8>,
    pub prescriptions: Vec<u8>,
}

impl HospitalSnapshot {
    /// Capture every extent of a live graph, in insertion order.
    pub fn capture(hospital: &Hospital) -> SnapshotResult<Self> {
        Ok(Self {
            people: save_all(&hospital.people().collect::<Vec<_>>())?,
            addresses: save_all(&hospital.addresses().collect::<Vec<_>>())?,
            departments: save_all(&hospital.departments().collect::<Vec<_>>())?,
            rooms: save_all(&hospital.rooms().collect::<Vec<_>>())?,
            assignments: save_all(&hospital.assignments().collect::<Vec<_>>())?,
            appointments: save_all(&hospital.appointments().collect::<Vec<_>>())?,
            surgeries: save_all(&hospital.surgeries().collect::<Vec<_>>())?,
            participations: save_all(&hospital.participations().collect::<Vec<_>>())?,
            medical_records: save_all(&hospital.medical_records().collect::<Vec<_>>())?,
            consultations: save_all(&hospital.consultations().collect::<Vec<_>>())?,
            diagnoses: save_all(&hospital.diagnoses().collect::<Vec<_>>())?,
            prescriptions: save_all(&hospital.prescriptions().collect::<Vec<_>>())?,
        })
    }
}
