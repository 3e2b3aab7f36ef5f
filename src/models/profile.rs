use serde::{Deserialize, Serialize};

/// Patient profile fields edited in the profile view.
///
/// Owned by the client until explicitly submitted; not validated beyond
/// presence. Empty strings are permitted and the age stays a free-text
/// string exactly as the form captures it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub age: String,
    pub medical_history: String,
}
