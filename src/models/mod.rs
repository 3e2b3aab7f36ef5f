//! Typed records exchanged with the backend collaborators.
//!
//! Collaborator payloads are JSON with camelCase keys; every type here
//! derives serde with the wire naming. Payloads are validated at the
//! boundary (`validate()`) so malformed data never propagates inward.

pub mod history;
pub mod medicine;
pub mod profile;

pub use history::HistoryEntry;
pub use medicine::{AnalysisResult, MedicineRecord};
pub use profile::ProfileData;

/// A collaborator payload that does not satisfy the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("medicine record {index} has an empty name")]
    EmptyMedicineName { index: usize },
}
