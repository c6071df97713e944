use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::enums::{Alcohol, Diet, Exercise, SleepHours, Smoking};

/// The single per-client health record. Every field except `name` and
/// `age` is optional and defaults to an empty string or set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthProfile {
    pub personal_info: PersonalInfo,
    pub vital_signs: VitalSigns,
    pub medical_history: MedicalHistory,
    pub lifestyle: Lifestyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub age: String,
    pub gender: String,
    /// Centimetres, as entered.
    pub height: String,
    /// Kilograms, as entered.
    pub weight: String,
    pub blood_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VitalSigns {
    /// "systolic/diastolic"
    pub blood_pressure: String,
    pub heart_rate: String,
    pub blood_sugar: String,
    pub cholesterol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalHistory {
    pub conditions: BTreeSet<String>,
    pub allergies: String,
    pub medications: String,
    pub surgeries: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifestyle {
    pub smoking: Smoking,
    pub alcohol: Alcohol,
    pub exercise: Exercise,
    pub diet: Diet,
    pub sleep: SleepHours,
}

/// Condition tags offered by the profile form, with display labels.
pub const KNOWN_CONDITIONS: &[(&str, &str)] = &[
    ("diabetes", "Diabetes"),
    ("hypertension", "Hypertension"),
    ("asthma", "Asthma"),
    ("heart-disease", "Heart Disease"),
    ("cancer", "Cancer"),
    ("arthritis", "Arthritis"),
    ("thyroid", "Thyroid Disorder"),
    ("depression", "Depression/Anxiety"),
];

/// Display label for a condition tag; unknown tags pass through.
pub fn condition_label(tag: &str) -> &str {
    KNOWN_CONDITIONS
        .iter()
        .find(|(id, _)| *id == tag)
        .map(|(_, label)| *label)
        .unwrap_or(tag)
}

impl MedicalHistory {
    /// Adds the tag if absent, removes it if present.
    pub fn toggle_condition(&mut self, tag: &str) {
        if !self.conditions.remove(tag) {
            self.conditions.insert(tag.to_string());
        }
    }

    /// Comma-separated condition labels, `None` when no conditions are set.
    pub fn condition_summary(&self) -> Option<String> {
        if self.conditions.is_empty() {
            return None;
        }
        Some(
            self.conditions
                .iter()
                .map(|c| condition_label(c))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_deserialize_to_defaults() {
        let json = r#"{"personalInfo":{"name":"Asha","age":"34"}}"#;
        let profile: HealthProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.personal_info.name, "Asha");
        assert_eq!(profile.personal_info.height, "");
        assert!(profile.medical_history.conditions.is_empty());
        assert_eq!(profile.lifestyle.sleep, SleepHours::SevenToEight);
    }

    #[test]
    fn serializes_with_camel_case_sections() {
        let json = serde_json::to_value(HealthProfile::default()).unwrap();
        assert!(json.get("personalInfo").is_some());
        assert!(json["personalInfo"].get("bloodType").is_some());
        assert!(json["vitalSigns"].get("bloodPressure").is_some());
        assert_eq!(json["lifestyle"]["exercise"], "sedentary");
    }

    #[test]
    fn toggle_condition_adds_then_removes() {
        let mut history = MedicalHistory::default();
        history.toggle_condition("asthma");
        assert!(history.conditions.contains("asthma"));
        history.toggle_condition("asthma");
        assert!(history.conditions.is_empty());
    }

    #[test]
    fn condition_summary_uses_labels() {
        let mut history = MedicalHistory::default();
        assert_eq!(history.condition_summary(), None);
        history.toggle_condition("heart-disease");
        history.toggle_condition("gout");
        assert_eq!(history.condition_summary().unwrap(), "gout, Heart Disease");
    }
}
