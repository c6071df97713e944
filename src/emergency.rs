//! Emergency card: the subset of the profile a first responder needs,
//! shareable as a self-contained token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{condition_label, HealthProfile};

pub const EMERGENCY_CONTACT_HINT: &str = "Add emergency contact in profile";
const NONE_REPORTED: &str = "None reported";
const TOKEN_KEY: &str = "emergencyCard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyCard {
    pub name: String,
    pub blood_type: String,
    pub conditions: Vec<String>,
    pub allergies: String,
    pub medications: String,
    #[serde(rename = "emergency_contact")]
    pub emergency_contact: String,
}

impl EmergencyCard {
    pub fn from_profile(profile: &HealthProfile) -> Self {
        let history = &profile.medical_history;
        Self {
            name: profile.personal_info.name.clone(),
            blood_type: profile.personal_info.blood_type.clone(),
            conditions: history.conditions.iter().cloned().collect(),
            allergies: history.allergies.clone(),
            medications: history.medications.clone(),
            emergency_contact: EMERGENCY_CONTACT_HINT.to_string(),
        }
    }

    /// URL-safe base64 of the card's JSON.
    pub fn share_token(&self) -> Result<String, StoreError> {
        let json =
            serde_json::to_vec(self).map_err(|e| StoreError::serialization(TOKEN_KEY, e))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn from_token(token: &str) -> Result<Self, StoreError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim().trim_end_matches('='))
            .map_err(|e| StoreError::serialization(TOKEN_KEY, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::serialization(TOKEN_KEY, e))
    }

    pub fn share_link(&self, origin: &str) -> Result<String, StoreError> {
        Ok(format!(
            "{}/emergency-view?id={}",
            origin.trim_end_matches('/'),
            self.share_token()?
        ))
    }

    /// QR code (SVG) encoding the card's JSON, for printing on the card.
    pub fn qr_svg(&self) -> Result<String, StoreError> {
        use qrcode::render::svg;
        use qrcode::QrCode;

        let json =
            serde_json::to_string(self).map_err(|e| StoreError::serialization(TOKEN_KEY, e))?;
        let code = QrCode::new(json.as_bytes())
            .map_err(|e| StoreError::serialization(TOKEN_KEY, format!("QR generation failed: {e}")))?;

        Ok(code
            .render::<svg::Color>()
            .min_dimensions(200, 200)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .quiet_zone(true)
            .build())
    }

    /// `(label, value)` rows as shown on the printed card.
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        let or_none = |s: &str| {
            if s.trim().is_empty() {
                NONE_REPORTED.to_string()
            } else {
                s.to_string()
            }
        };
        let conditions = self
            .conditions
            .iter()
            .map(|c| condition_label(c))
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            ("Name", self.name.clone()),
            ("Blood Type", or_none(&self.blood_type)),
            ("Medical Conditions", or_none(&conditions)),
            ("Allergies", or_none(&self.allergies)),
            ("Current Medications", or_none(&self.medications)),
            ("Emergency Contact", self.emergency_contact.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> HealthProfile {
        let mut p = HealthProfile::default();
        p.personal_info.name = "Asha".into();
        p.personal_info.blood_type = "O+".into();
        p.medical_history.toggle_condition("asthma");
        p.medical_history.allergies = "Penicillin".into();
        p
    }

    #[test]
    fn card_copies_critical_fields() {
        let card = EmergencyCard::from_profile(&profile());
        assert_eq!(card.name, "Asha");
        assert_eq!(card.blood_type, "O+");
        assert_eq!(card.conditions, vec!["asthma"]);
        assert_eq!(card.emergency_contact, EMERGENCY_CONTACT_HINT);
    }

    #[test]
    fn token_decodes_to_same_card() {
        let card = EmergencyCard::from_profile(&profile());
        let token = card.share_token().unwrap();
        assert!(!token.contains('+') && !token.contains('/') && !token.contains('='));
        assert_eq!(EmergencyCard::from_token(&token).unwrap(), card);
    }

    #[test]
    fn json_keys_match_share_format() {
        let card = EmergencyCard::from_profile(&profile());
        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("bloodType").is_some());
        assert!(json.get("emergency_contact").is_some());
    }

    #[test]
    fn malformed_token_is_serialization_error() {
        let err = EmergencyCard::from_token("not*base64").unwrap_err();
        assert!(matches!(err, StoreError::Serialization { .. }));

        let not_json = URL_SAFE_NO_PAD.encode("hello");
        let err = EmergencyCard::from_token(&not_json).unwrap_err();
        assert!(matches!(err, StoreError::Serialization { .. }));
    }

    #[test]
    fn share_link_format() {
        let card = EmergencyCard::from_profile(&profile());
        let link = card.share_link("https://arogya.example/").unwrap();
        let token = card.share_token().unwrap();
        assert_eq!(link, format!("https://arogya.example/emergency-view?id={token}"));
    }

    #[test]
    fn qr_svg_is_rendered() {
        let svg = EmergencyCard::from_profile(&profile()).qr_svg().unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#000000"));
    }

    #[test]
    fn display_rows_report_missing_values() {
        let card = EmergencyCard::from_profile(&HealthProfile::default());
        let rows = card.display_rows();
        assert_eq!(rows[1], ("Blood Type", "None reported".to_string()));
        assert_eq!(rows[2], ("Medical Conditions", "None reported".to_string()));
    }
}
