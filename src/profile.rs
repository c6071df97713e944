//! Health profile store — the single per-client record.
//!
//! Save replaces the whole snapshot (no merge, no version stamp). Two tabs
//! saving concurrently resolve as last-write-wins.

use std::sync::Arc;

use crate::db::{ClientStorage, PROFILE_KEY};
use crate::error::StoreError;
use crate::models::HealthProfile;

pub struct ProfileStore {
    storage: Arc<dyn ClientStorage>,
}

impl ProfileStore {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    /// Returns the stored profile, `None` if nothing was saved yet.
    pub fn load(&self) -> Result<Option<HealthProfile>, StoreError> {
        let Some(raw) = self.storage.get(PROFILE_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::serialization(PROFILE_KEY, e))
    }

    /// Like `load`, but unreadable or missing data yields the default profile.
    pub fn load_or_default(&self) -> HealthProfile {
        match self.load() {
            Ok(Some(profile)) => profile,
            Ok(None) => HealthProfile::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Health profile unreadable, using defaults");
                HealthProfile::default()
            }
        }
    }

    /// Validates and overwrites the stored profile.
    pub fn save(&self, profile: &HealthProfile) -> Result<(), StoreError> {
        validate(profile)?;
        let json = serde_json::to_string(profile)
            .map_err(|e| StoreError::serialization(PROFILE_KEY, e))?;
        self.storage.set(PROFILE_KEY, &json)?;
        tracing::info!(
            conditions = profile.medical_history.conditions.len(),
            "Health profile saved"
        );
        Ok(())
    }

    pub fn exists(&self) -> Result<bool, StoreError> {
        Ok(self.storage.get(PROFILE_KEY)?.is_some())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(PROFILE_KEY)?;
        tracing::info!("Health profile cleared");
        Ok(())
    }
}

/// Name and age are mandatory; everything else may be blank.
pub fn validate(profile: &HealthProfile) -> Result<(), StoreError> {
    if profile.personal_info.name.trim().is_empty() {
        return Err(StoreError::required("name"));
    }
    if profile.personal_info.age.trim().is_empty() {
        return Err(StoreError::required("age"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use crate::models::{Diet, Exercise};

    fn store() -> ProfileStore {
        ProfileStore::new(Arc::new(MemoryStorage::new()))
    }

    fn sample_profile() -> HealthProfile {
        let mut p = HealthProfile::default();
        p.personal_info.name = "Asha Raman".into();
        p.personal_info.age = "34".into();
        p.personal_info.gender = "female".into();
        p.personal_info.height = "165".into();
        p.personal_info.weight = "60".into();
        p.personal_info.blood_type = "O+".into();
        p.vital_signs.blood_pressure = "120/80".into();
        p.vital_signs.heart_rate = "72".into();
        p.medical_history.toggle_condition("asthma");
        p.medical_history.allergies = "Penicillin".into();
        p.lifestyle.exercise = Exercise::Light;
        p.lifestyle.diet = Diet::Vegetarian;
        p
    }

    #[test]
    fn load_before_save_is_absent() {
        assert_eq!(store().load().unwrap(), None);
        assert!(!store().exists().unwrap());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = store();
        let profile = sample_profile();
        store.save(&profile).unwrap();
        assert_eq!(store.load().unwrap(), Some(profile));
    }

    #[test]
    fn save_overwrites_without_merge() {
        let store = store();
        store.save(&sample_profile()).unwrap();

        let mut minimal = HealthProfile::default();
        minimal.personal_info.name = "Ravi".into();
        minimal.personal_info.age = "50".into();
        store.save(&minimal).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, minimal);
        assert!(loaded.medical_history.allergies.is_empty());
    }

    #[test]
    fn blank_name_is_rejected_without_writing() {
        let store = store();
        let mut profile = sample_profile();
        profile.personal_info.name = "   ".into();
        let err = store.save(&profile).unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field } if field == "name"));
        assert!(err.is_validation());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn empty_age_is_rejected() {
        let mut profile = sample_profile();
        profile.personal_info.age.clear();
        let err = validate(&profile).unwrap_err();
        assert_eq!(err.to_string(), "age is required");
    }

    #[test]
    fn corrupt_snapshot_surfaces_serialization_error() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(PROFILE_KEY, "{not json").unwrap();
        let store = ProfileStore::new(storage);

        assert!(matches!(store.load(), Err(StoreError::Serialization { .. })));
        assert_eq!(store.load_or_default(), HealthProfile::default());
    }

    #[test]
    fn clear_removes_profile() {
        let store = store();
        store.save(&sample_profile()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
