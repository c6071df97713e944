//! Derived health metrics. Computed on every read, never persisted.

use serde::{Deserialize, Serialize};

use crate::models::HealthProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Lower bounds are inclusive: 18.5 is Normal, 25 Overweight, 30 Obese.
    pub fn from_value(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bmi {
    pub value: f64,
    pub category: BmiCategory,
}

impl Bmi {
    /// Position on a 0–40 gauge, as a percentage capped at 100.
    pub fn gauge_percent(&self) -> f64 {
        (self.value / 40.0 * 100.0).min(100.0)
    }
}

impl std::fmt::Display for Bmi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} - {}", self.value, self.category.label())
    }
}

/// BMI from height (cm) and weight (kg). `None` when either is missing,
/// non-finite or not positive.
pub fn compute_bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<Bmi> {
    let height_cm = height_cm.filter(|h| h.is_finite() && *h > 0.0)?;
    let weight_kg = weight_kg.filter(|w| w.is_finite() && *w > 0.0)?;
    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);
    Some(Bmi {
        value,
        category: BmiCategory::from_value(value),
    })
}

/// Parses a free-text measurement field. Blank or non-numeric → `None`.
pub fn parse_measure(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// BMI from the profile's current height and weight.
pub fn bmi_for(profile: &HealthProfile) -> Option<Bmi> {
    compute_bmi(
        parse_measure(&profile.personal_info.height),
        parse_measure(&profile.personal_info.weight),
    )
}
