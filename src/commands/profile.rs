use std::io::Write;
use std::path::Path;

use super::{or_na, CommandResult};
use crate::db::PROFILE_KEY;
use crate::emergency::EmergencyCard;
use crate::error::StoreError;
use crate::models::{Alcohol, Diet, Exercise, HealthProfile, SleepHours, Smoking};
use crate::session::HealthSession;

/// Overwrites each slot whose update is `Some`, trimmed.
fn overwrite<const N: usize>(fields: [(&mut String, Option<String>); N]) {
    for (slot, value) in fields {
        if let Some(value) = value {
            *slot = value.trim().to_string();
        }
    }
}

/// Fields `profile set-basic` may overwrite; `None` leaves the stored value.
#[derive(Debug, Default, Clone)]
pub struct BasicInfoUpdate {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub blood_type: Option<String>,
}

impl BasicInfoUpdate {
    fn apply(self, profile: &mut HealthProfile) {
        let info = &mut profile.personal_info;
        overwrite([
            (&mut info.name, self.name),
            (&mut info.age, self.age),
            (&mut info.gender, self.gender),
            (&mut info.height, self.height),
            (&mut info.weight, self.weight),
            (&mut info.blood_type, self.blood_type),
        ]);
    }
}

#[derive(Debug, Default, Clone)]
pub struct VitalsUpdate {
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<String>,
    pub blood_sugar: Option<String>,
    pub cholesterol: Option<String>,
}

impl VitalsUpdate {
    fn apply(self, profile: &mut HealthProfile) {
        let vitals = &mut profile.vital_signs;
        overwrite([
            (&mut vitals.blood_pressure, self.blood_pressure),
            (&mut vitals.heart_rate, self.heart_rate),
            (&mut vitals.blood_sugar, self.blood_sugar),
            (&mut vitals.cholesterol, self.cholesterol),
        ]);
    }
}

/// `toggle_conditions` flips each tag on or off, like the form checkboxes.
#[derive(Debug, Default, Clone)]
pub struct HistoryUpdate {
    pub toggle_conditions: Vec<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub surgeries: Option<String>,
}

impl HistoryUpdate {
    fn apply(self, profile: &mut HealthProfile) {
        let history = &mut profile.medical_history;
        for tag in &self.toggle_conditions {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() {
                history.toggle_condition(&tag);
            }
        }
        overwrite([
            (&mut history.allergies, self.allergies),
            (&mut history.medications, self.medications),
            (&mut history.surgeries, self.surgeries),
        ]);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LifestyleUpdate {
    pub smoking: Option<Smoking>,
    pub alcohol: Option<Alcohol>,
    pub exercise: Option<Exercise>,
    pub diet: Option<Diet>,
    pub sleep: Option<SleepHours>,
}

impl LifestyleUpdate {
    fn apply(self, profile: &mut HealthProfile) {
        let lifestyle = &mut profile.lifestyle;
        if let Some(v) = self.smoking {
            lifestyle.smoking = v;
        }
        if let Some(v) = self.alcohol {
            lifestyle.alcohol = v;
        }
        if let Some(v) = self.exercise {
            lifestyle.exercise = v;
        }
        if let Some(v) = self.diet {
            lifestyle.diet = v;
        }
        if let Some(v) = self.sleep {
            lifestyle.sleep = v;
        }
    }
}

/// Loads the stored (or a fresh) profile, applies `edit` and saves it.
/// Nothing is written when validation fails.
fn update_profile(
    session: &HealthSession,
    out: &mut impl Write,
    edit: impl FnOnce(&mut HealthProfile),
) -> CommandResult {
    let mut profile = session.profile().load_or_default();
    edit(&mut profile);
    session.profile().save(&profile)?;
    writeln!(out, "Profile saved for {}.", profile.personal_info.name)?;
    Ok(())
}

pub fn show(session: &HealthSession, out: &mut impl Write) -> CommandResult {
    let Some(profile) = session.profile().load()? else {
        writeln!(out, "No health profile saved yet. Run `arogya profile set-basic` first.")?;
        return Ok(());
    };

    let info = &profile.personal_info;
    let vitals = &profile.vital_signs;
    let history = &profile.medical_history;
    let lifestyle = &profile.lifestyle;

    writeln!(out, "Name:           {}", info.name)?;
    writeln!(out, "Age:            {}", info.age)?;
    writeln!(out, "Gender:         {}", or_na(&info.gender))?;
    writeln!(out, "Height (cm):    {}", or_na(&info.height))?;
    writeln!(out, "Weight (kg):    {}", or_na(&info.weight))?;
    writeln!(out, "Blood type:     {}", or_na(&info.blood_type))?;
    writeln!(out, "Blood pressure: {}", or_na(&vitals.blood_pressure))?;
    writeln!(out, "Heart rate:     {}", or_na(&vitals.heart_rate))?;
    writeln!(out, "Blood sugar:    {}", or_na(&vitals.blood_sugar))?;
    writeln!(out, "Cholesterol:    {}", or_na(&vitals.cholesterol))?;
    writeln!(
        out,
        "Conditions:     {}",
        history.condition_summary().as_deref().unwrap_or("None reported")
    )?;
    writeln!(out, "Allergies:      {}", or_na(&history.allergies))?;
    writeln!(out, "Medications:    {}", or_na(&history.medications))?;
    writeln!(out, "Surgeries:      {}", or_na(&history.surgeries))?;
    writeln!(out, "Smoking:        {}", lifestyle.smoking.label())?;
    writeln!(out, "Alcohol:        {}", lifestyle.alcohol.label())?;
    writeln!(out, "Exercise:       {}", lifestyle.exercise.label())?;
    writeln!(out, "Diet:           {}", lifestyle.diet.label())?;
    writeln!(out, "Sleep:          {}", lifestyle.sleep.label())?;
    Ok(())
}

pub fn set_basic(
    session: &HealthSession,
    update: BasicInfoUpdate,
    out: &mut impl Write,
) -> CommandResult {
    update_profile(session, out, |p| update.apply(p))
}

pub fn set_vitals(
    session: &HealthSession,
    update: VitalsUpdate,
    out: &mut impl Write,
) -> CommandResult {
    update_profile(session, out, |p| update.apply(p))
}

pub fn set_history(
    session: &HealthSession,
    update: HistoryUpdate,
    out: &mut impl Write,
) -> CommandResult {
    update_profile(session, out, |p| update.apply(p))
}

pub fn set_lifestyle(
    session: &HealthSession,
    update: LifestyleUpdate,
    out: &mut impl Write,
) -> CommandResult {
    update_profile(session, out, |p| update.apply(p))
}

/// Replaces the stored profile with the JSON document at `path`
/// (the same camelCase shape the store persists).
pub fn import(session: &HealthSession, path: &Path, out: &mut impl Write) -> CommandResult {
    let json = std::fs::read_to_string(path)?;
    let profile: HealthProfile =
        serde_json::from_str(&json).map_err(|e| StoreError::serialization(PROFILE_KEY, e))?;
    session.profile().save(&profile)?;
    tracing::info!(path = %path.display(), "Health profile imported");
    writeln!(out, "Profile imported for {}.", profile.personal_info.name)?;
    Ok(())
}

const GAUGE_CELLS: usize = 20;

/// Text rendering of the 0-40 BMI scale.
fn gauge_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * GAUGE_CELLS as f64).round() as usize;
    let filled = filled.min(GAUGE_CELLS);
    format!(
        "[{}{}] {percent:.0}% of scale (0-40)",
        "#".repeat(filled),
        ".".repeat(GAUGE_CELLS - filled)
    )
}

pub fn bmi(session: &HealthSession, out: &mut impl Write) -> CommandResult {
    match session.bmi() {
        Some(bmi) => {
            writeln!(out, "BMI: {bmi}")?;
            writeln!(out, "{}", gauge_bar(bmi.gauge_percent()))?;
        }
        None => writeln!(out, "BMI unavailable: height and weight must both be set.")?,
    }
    Ok(())
}

/// Prints the card and share link; with `qr_path`, also writes the QR SVG.
pub fn card(
    session: &HealthSession,
    origin: &str,
    qr_path: Option<&Path>,
    out: &mut impl Write,
) -> CommandResult {
    let Some(card) = session.emergency_card()? else {
        writeln!(out, "Please create your health profile to generate an emergency card.")?;
        return Ok(());
    };
    for (label, value) in card.display_rows() {
        writeln!(out, "{label}: {value}")?;
    }
    writeln!(out)?;
    writeln!(out, "Share link: {}", card.share_link(origin)?)?;
    if let Some(path) = qr_path {
        std::fs::write(path, card.qr_svg()?)?;
        writeln!(out, "QR code written to {}", path.display())?;
    }
    Ok(())
}

/// Decodes a shared card token and prints what a responder would see.
pub fn card_view(token: &str, out: &mut impl Write) -> CommandResult {
    let card = EmergencyCard::from_token(token)?;
    writeln!(out, "EMERGENCY MEDICAL INFORMATION")?;
    for (label, value) in card.display_rows() {
        writeln!(out, "{label}: {value}")?;
    }
    Ok(())
}
