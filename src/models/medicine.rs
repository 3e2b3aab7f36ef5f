use serde::{Deserialize, Serialize};

use super::PayloadError;

/// One medicine as extracted from a prescription.
///
/// Identity is the name string; the analysis service guarantees no
/// internal id, and names may repeat across analyses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_hints: Option<String>,
}

impl MedicineRecord {
    /// A record with only a name, as the analysis service often returns.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dosage: None,
            schedule_hints: None,
        }
    }
}

/// The structured output of one prescription analysis.
///
/// Never partially constructed: a result is either absent or complete.
/// The medicine order is the order the analysis service produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub medicines: Vec<MedicineRecord>,
}

impl AnalysisResult {
    pub fn new(medicines: Vec<MedicineRecord>) -> Self {
        Self { medicines }
    }

    /// Boundary check: every record must carry a non-blank name.
    /// A payload failing this is rejected whole, never trimmed.
    pub fn validate(&self) -> Result<(), PayloadError> {
        for (index, record) in self.medicines.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(PayloadError::EmptyMedicineName { index });
            }
        }
        Ok(())
    }

    /// Medicine names in analysis order, for summary rendering.
    pub fn medicine_names(&self) -> Vec<&str> {
        self.medicines.iter().map(|m| m.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_payload_uses_camel_case() {
        let json = r#"{"name":"Amoxicillin","dosage":"500mg","scheduleHints":"3x daily"}"#;
        let record: MedicineRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Amoxicillin");
        assert_eq!(record.dosage.as_deref(), Some("500mg"));
        assert_eq!(record.schedule_hints.as_deref(), Some("3x daily"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let record: MedicineRecord = serde_json::from_str(r#"{"name":"Ibuprofen"}"#).unwrap();
        assert!(record.dosage.is_none());
        assert!(record.schedule_hints.is_none());
    }

    #[test]
    fn validate_accepts_well_formed_result() {
        let result = AnalysisResult::new(vec![
            MedicineRecord::named("Amoxicillin"),
            MedicineRecord::named("Ibuprofen"),
        ]);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let result = AnalysisResult::new(vec![
            MedicineRecord::named("Amoxicillin"),
            MedicineRecord::named("   "),
        ]);
        assert_eq!(
            result.validate(),
            Err(PayloadError::EmptyMedicineName { index: 1 })
        );
    }

    #[test]
    fn empty_medicine_list_is_valid() {
        // The collaborator may legitimately find nothing readable.
        assert!(AnalysisResult::new(vec![]).validate().is_ok());
    }

    #[test]
    fn medicine_names_preserve_order() {
        let result = AnalysisResult::new(vec![
            MedicineRecord::named("B"),
            MedicineRecord::named("A"),
        ]);
        assert_eq!(result.medicine_names(), vec!["B", "A"]);
    }
}
