use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One synthetic patient record as loaded from the user directory file.
///
/// `examination_results` and `treatment_plan` are clinical detail: they stay
/// on the record but are never serialized into an oracle prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub profile: Profile,
    #[serde(rename = "diseaseInfo")]
    pub disease_info: DiseaseInfo,
    #[serde(default)]
    pub relations: Relations,
    #[serde(rename = "patientInfo", default)]
    pub patient_info: Map<String, Value>,
    #[serde(rename = "examinationResults", default)]
    pub examination_results: Map<String, Value>,
    #[serde(rename = "treatmentPlan", default)]
    pub treatment_plan: Map<String, Value>,
}

/// Identity plus opaque profile attributes (age, occupation, whatever the
/// generator produced). Only `id` is interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseInfo {
    #[serde(default)]
    pub disease: String,
}

/// Neighbor ids bucketed by tie strength. Duplicates are not excluded and
/// edges are not guaranteed reciprocal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relations {
    #[serde(default)]
    pub strong: Vec<u64>,
    #[serde(default)]
    pub moderate: Vec<u64>,
    #[serde(default)]
    pub weak: Vec<u64>,
}

impl Relations {
    pub fn is_empty(&self) -> bool {
        self.strong.is_empty() && self.moderate.is_empty() && self.weak.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: u64,
    pub content: String,
    pub disease: String,
}

impl User {
    pub fn id(&self) -> u64 {
        self.profile.id
    }

    pub fn disease(&self) -> &str {
        &self.disease_info.disease
    }

    /// The view of this user that oracle prompts are allowed to see:
    /// profile, disease, patient info. Relations and clinical fields
    /// (examination results, treatment plan) are excluded.
    pub fn prompt_view(&self) -> Value {
        serde_json::json!({
            "profile": &self.profile,
            "diseaseInfo": &self.disease_info,
            "patientInfo": &self.patient_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_view_excludes_clinical_fields() {
        let user: User = serde_json::from_value(serde_json::json!({
            "profile": { "id": 3, "age": 44 },
            "diseaseInfo": { "disease": "Asthma" },
            "relations": { "strong": [1], "moderate": [], "weak": [] },
            "patientInfo": { "smoker": false },
            "examinationResults": { "fev1": 2.1 },
            "treatmentPlan": { "inhaler": "daily" }
        }))
        .unwrap();

        let view = user.prompt_view();
        let text = serde_json::to_string(&view).unwrap();
        assert!(text.contains("Asthma"));
        assert!(text.contains("smoker"));
        assert!(!text.contains("fev1"));
        assert!(!text.contains("inhaler"));
        assert!(!text.contains("relations"));
    }

    #[test]
    fn test_missing_optional_sections_default() {
        let user: User = serde_json::from_value(serde_json::json!({
            "profile": { "id": 9 },
            "diseaseInfo": { "disease": "Gout" }
        }))
        .unwrap();

        assert_eq!(user.id(), 9);
        assert!(user.relations.is_empty());
        assert!(user.patient_info.is_empty());
    }
}
