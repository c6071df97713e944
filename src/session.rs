//! Per-client session: owns the storage handle and every store.
//!
//! Constructed once at startup and passed to whatever drives the app
//! (the CLI today). There is no global state.

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::ai::{self, NarrativeService, SupportedLanguage};
use crate::config;
use crate::db::{ClientStorage, MemoryStorage, SqliteStorage, PROFILE_KEY};
use crate::digest::{self, DigestDocument, NARRATIVE_PLACEHOLDER};
use crate::emergency::EmergencyCard;
use crate::error::StoreError;
use crate::journal::{fallback_response, MoodLogStore, NO_CONTEXT};
use crate::medications::{MedicationScheduleStore, ReminderNotice};
use crate::metrics::{bmi_for, Bmi};
use crate::models::{HealthProfile, Mood, MoodEntry};
use crate::profile::ProfileStore;

pub struct HealthSession {
    profile: ProfileStore,
    medications: MedicationScheduleStore,
    moods: MoodLogStore,
}

impl HealthSession {
    /// Session backed by the SQLite database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let storage = SqliteStorage::open(db_path)?;
        tracing::info!(path = %db_path.display(), "Health session opened");
        Self::with_storage(Arc::new(storage))
    }

    /// Non-persistent session, used by tests and dry runs.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(storage: Arc<dyn ClientStorage>) -> Result<Self, StoreError> {
        Ok(Self {
            profile: ProfileStore::new(Arc::clone(&storage)),
            medications: MedicationScheduleStore::open(Arc::clone(&storage))?,
            moods: MoodLogStore::open(storage)?,
        })
    }

    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    pub fn medications(&self) -> &MedicationScheduleStore {
        &self.medications
    }

    pub fn medications_mut(&mut self) -> &mut MedicationScheduleStore {
        &mut self.medications
    }

    pub fn moods(&self) -> &MoodLogStore {
        &self.moods
    }

    pub fn moods_mut(&mut self) -> &mut MoodLogStore {
        &mut self.moods
    }

    /// BMI of the stored profile; `None` without usable height/weight.
    pub fn bmi(&self) -> Option<Bmi> {
        bmi_for(&self.profile.load_or_default())
    }

    /// Reminders due at `now` under the configured tolerance.
    pub fn reminders(&self, now: NaiveDateTime) -> Vec<ReminderNotice> {
        self.medications.reminders(now, config::DUE_TOLERANCE_MINUTES)
    }

    pub fn compose_digest(&self, narrative: &str, generated_on: NaiveDate) -> DigestDocument {
        digest::compose(&self.profile.load_or_default(), narrative, generated_on)
    }

    fn require_profile(&self) -> Result<HealthProfile, StoreError> {
        self.profile.load()?.ok_or_else(|| StoreError::NotFound {
            entity_type: "HealthProfile".into(),
            id: PROFILE_KEY.into(),
        })
    }

    /// Profile insights straight from the text service.
    pub fn try_generate_insights(
        &self,
        service: &dyn NarrativeService,
        language: SupportedLanguage,
    ) -> Result<String, StoreError> {
        let profile = self.require_profile()?;
        let request = ai::health_profile_analysis(&profile, language);
        let text = service.complete(&request)?;
        tracing::info!(language = %language.code(), chars = text.len(), "Insights generated");
        Ok(text)
    }

    /// Like `try_generate_insights`, but a service failure yields the
    /// digest placeholder so the digest can still be produced.
    pub fn generate_insights(
        &self,
        service: &dyn NarrativeService,
        language: SupportedLanguage,
    ) -> Result<String, StoreError> {
        match self.try_generate_insights(service, language) {
            Err(StoreError::ExternalService(reason)) => {
                tracing::warn!(%reason, "Insights unavailable, using placeholder");
                Ok(NARRATIVE_PLACEHOLDER.to_string())
            }
            other => other,
        }
    }

    /// Asks the text service for a supportive reply and records the
    /// check-in. A service failure falls back to the canned response.
    pub fn record_mood(
        &mut self,
        service: &dyn NarrativeService,
        mood: Mood,
        context: &str,
        language: SupportedLanguage,
    ) -> Result<MoodEntry, StoreError> {
        let context = context.trim();
        let prompt_context = if context.is_empty() {
            NO_CONTEXT
        } else {
            context
        };
        let request = ai::mood_support(mood, prompt_context, language);
        let response = service.complete(&request).unwrap_or_else(|e| {
            tracing::warn!(error = %e, mood = %mood, "Mood response unavailable, using fallback");
            fallback_response(mood)
        });
        self.moods.append(mood, context, &response)
    }

    /// Card for the stored profile, `None` when no profile exists yet.
    pub fn emergency_card(&self) -> Result<Option<EmergencyCard>, StoreError> {
        Ok(self.profile.load()?.as_ref().map(EmergencyCard::from_profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockNarrativeService;
    use crate::models::{Frequency, NewMedication};

    fn saved_profile(session: &HealthSession) -> HealthProfile {
        let mut p = HealthProfile::default();
        p.personal_info.name = "Asha".into();
        p.personal_info.age = "34".into();
        p.personal_info.height = "180".into();
        p.personal_info.weight = "90".into();
        session.profile().save(&p).unwrap();
        p
    }

    #[test]
    fn file_backed_session_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("arogya.db");
        {
            let mut session = HealthSession::open(&db_path).unwrap();
            saved_profile(&session);
            session
                .medications_mut()
                .add(NewMedication {
                    name: "Metformin".into(),
                    dosage: "500mg".into(),
                    frequency: Frequency::Daily,
                    time: "08:00".into(),
                    days: vec![],
                })
                .unwrap();
        }
        let session = HealthSession::open(&db_path).unwrap();
        assert_eq!(session.profile().load().unwrap().unwrap().personal_info.name, "Asha");
        assert_eq!(session.medications().list().len(), 1);
    }

    #[test]
    fn bmi_absent_without_profile() {
        let session = HealthSession::in_memory().unwrap();
        assert!(session.bmi().is_none());
        saved_profile(&session);
        assert!((session.bmi().unwrap().value - 27.78).abs() < 0.01);
    }

    #[test]
    fn insights_use_service_text() {
        let session = HealthSession::in_memory().unwrap();
        saved_profile(&session);
        let service = MockNarrativeService::new("## Looking good");
        let text = session
            .generate_insights(&service, SupportedLanguage::English)
            .unwrap();
        assert_eq!(text, "## Looking good");
        assert!(service.calls()[0].prompt_text.contains("\"name\": \"Asha\""));
    }

    #[test]
    fn insights_fall_back_to_placeholder() {
        let session = HealthSession::in_memory().unwrap();
        saved_profile(&session);
        let service = MockNarrativeService::failing();

        let err = session
            .try_generate_insights(&service, SupportedLanguage::English)
            .unwrap_err();
        assert!(matches!(err, StoreError::ExternalService(_)));

        let text = session
            .generate_insights(&service, SupportedLanguage::English)
            .unwrap();
        assert_eq!(text, NARRATIVE_PLACEHOLDER);
    }

    #[test]
    fn insights_require_profile() {
        let session = HealthSession::in_memory().unwrap();
        let err = session
            .generate_insights(&MockNarrativeService::new("x"), SupportedLanguage::English)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn record_mood_uses_fallback_on_failure() {
        let mut session = HealthSession::in_memory().unwrap();
        let entry = session
            .record_mood(&MockNarrativeService::failing(), Mood::Sad, "", SupportedLanguage::English)
            .unwrap();
        assert_eq!(entry.response, fallback_response(Mood::Sad));
        assert_eq!(entry.context, NO_CONTEXT);
        assert_eq!(session.moods().list().len(), 1);
    }

    #[test]
    fn record_mood_stores_service_reply() {
        let mut session = HealthSession::in_memory().unwrap();
        let service = MockNarrativeService::new("You've got this.");
        let entry = session
            .record_mood(&service, Mood::Anxious, "exam", SupportedLanguage::Malayalam)
            .unwrap();
        assert_eq!(entry.response, "You've got this.");
        assert_eq!(service.calls()[0].target_language, SupportedLanguage::Malayalam);
    }

    #[test]
    fn digest_and_card_follow_profile() {
        let session = HealthSession::in_memory().unwrap();
        assert!(session.emergency_card().unwrap().is_none());

        saved_profile(&session);
        let card = session.emergency_card().unwrap().unwrap();
        assert_eq!(card.name, "Asha");

        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let digest = session.compose_digest("", date);
        assert!(digest.page_count() >= 2);
    }
}
