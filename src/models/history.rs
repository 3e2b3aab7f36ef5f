use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::medicine::{AnalysisResult, MedicineRecord};
use super::PayloadError;

/// An archived past analysis, owned by the history service.
///
/// The client holds a read-only cached copy for the lifetime of the
/// session; entries are never edited or deleted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub medicines: Vec<MedicineRecord>,
}

impl HistoryEntry {
    /// Boundary check, same record rule as a fresh analysis.
    pub fn validate(&self) -> Result<(), PayloadError> {
        AnalysisResult::new(self.medicines.clone()).validate()
    }

    /// Medicine names for the history card chips.
    pub fn medicine_names(&self) -> Vec<&str> {
        self.medicines.iter().map(|m| m.name.as_str()).collect()
    }

    /// Replayable copy of the archived medicines.
    pub fn to_analysis_result(&self) -> AnalysisResult {
        AnalysisResult::new(self.medicines.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(names: &[&str]) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            medicines: names.iter().map(|n| MedicineRecord::named(*n)).collect(),
        }
    }

    #[test]
    fn wire_payload_uses_camel_case() {
        let json = r#"{
            "id": "7f1aa2f0-9c57-4be0-8fdc-6b1f68d2f3aa",
            "createdAt": "2026-01-12T09:30:00Z",
            "medicines": [{"name": "Paracetamol"}]
        }"#;
        let parsed: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.medicines[0].name, "Paracetamol");
        assert_eq!(parsed.created_at.to_rfc3339(), "2026-01-12T09:30:00+00:00");
    }

    #[test]
    fn to_analysis_result_copies_medicines_in_order() {
        let e = entry(&["Ibuprofen", "Amoxicillin"]);
        let result = e.to_analysis_result();
        assert_eq!(result.medicine_names(), vec!["Ibuprofen", "Amoxicillin"]);
        // The archived entry stays untouched.
        assert_eq!(e.medicines.len(), 2);
    }

    #[test]
    fn validate_rejects_blank_medicine_name() {
        let e = entry(&["Ibuprofen", ""]);
        assert!(e.validate().is_err());
    }

    #[test]
    fn medicine_names_for_cards() {
        let e = entry(&["Metformin"]);
        assert_eq!(e.medicine_names(), vec!["Metformin"]);
    }
}
