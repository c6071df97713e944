//! Medication reminder schedule.
//!
//! The store owns the reminder list and answers two questions for a
//! caller-supplied wall-clock time: what is scheduled today, and what is
//! due within the forward tolerance window. It never runs a timer itself;
//! the UI polls `due_now` every `REMINDER_POLL_INTERVAL_SECS`.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{ClientStorage, MEDICATIONS_KEY};
use crate::error::StoreError;
use crate::models::{Frequency, Medication, NewMedication, TimeOfDay, Weekday};

/// Notification content for a due medication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderNotice {
    pub medication_id: String,
    pub title: String,
    pub body: String,
    pub time: String,
}

impl ReminderNotice {
    pub fn for_medication(med: &Medication) -> Self {
        Self {
            medication_id: med.id.clone(),
            title: format!("Time to take {}", med.name),
            body: format!("Dosage: {}", med.dosage),
            time: med.time.to_string(),
        }
    }
}

pub struct MedicationScheduleStore {
    storage: Arc<dyn ClientStorage>,
    medications: Vec<Medication>,
    load_error: Option<StoreError>,
}

impl MedicationScheduleStore {
    /// Loads the persisted list. An unreadable snapshot starts the store
    /// empty; the parse failure stays available through `load_error`.
    pub fn open(storage: Arc<dyn ClientStorage>) -> Result<Self, StoreError> {
        let (medications, load_error) = match storage.get(MEDICATIONS_KEY)? {
            None => (Vec::new(), None),
            Some(raw) => match serde_json::from_str::<Vec<Medication>>(&raw) {
                Ok(meds) => (meds, None),
                Err(e) => {
                    tracing::warn!(error = %e, "Medication list unreadable, starting empty");
                    (Vec::new(), Some(StoreError::serialization(MEDICATIONS_KEY, e)))
                }
            },
        };
        Ok(Self {
            storage,
            medications,
            load_error,
        })
    }

    pub fn load_error(&self) -> Option<&StoreError> {
        self.load_error.as_ref()
    }

    /// All reminders in insertion order.
    pub fn list(&self) -> &[Medication] {
        &self.medications
    }

    pub fn get(&self, id: &str) -> Option<&Medication> {
        self.medications.iter().find(|m| m.id == id)
    }

    /// Validates and appends a reminder. Daily reminders always cover all
    /// seven days regardless of `input.days`.
    pub fn add(&mut self, input: NewMedication) -> Result<Medication, StoreError> {
        let name = input.name.trim();
        let dosage = input.dosage.trim();
        if name.is_empty() {
            return Err(StoreError::required("name"));
        }
        if dosage.is_empty() {
            return Err(StoreError::required("dosage"));
        }
        let time: TimeOfDay = input.time.parse().map_err(|e| StoreError::InvalidField {
            field: "time".into(),
            reason: format!("{e}"),
        })?;

        let days: BTreeSet<Weekday> = match input.frequency {
            Frequency::Daily => Weekday::ALL.iter().copied().collect(),
            Frequency::Custom => input.days.into_iter().collect(),
        };

        let medication = Medication {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            dosage: dosage.to_string(),
            frequency: input.frequency,
            time,
            days,
        };

        let mut next = self.medications.clone();
        next.push(medication.clone());
        self.persist(&next)?;
        self.medications = next;

        tracing::info!(
            medication_id = %medication.id,
            frequency = %medication.frequency,
            time = %medication.time,
            "Medication reminder added"
        );
        Ok(medication)
    }

    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        let Some(index) = self.medications.iter().position(|m| m.id == id) else {
            return Err(StoreError::NotFound {
                entity_type: "Medication".into(),
                id: id.into(),
            });
        };

        let mut next = self.medications.clone();
        next.remove(index);
        self.persist(&next)?;
        self.medications = next;

        tracing::info!(medication_id = %id, "Medication reminder removed");
        Ok(())
    }

    /// Reminders scheduled on the weekday of `now`.
    pub fn due_today(&self, now: NaiveDateTime) -> Vec<&Medication> {
        let today = Weekday::from_chrono(now.date().weekday());
        self.medications
            .iter()
            .filter(|m| m.days.contains(&today))
            .collect()
    }

    /// Today's reminders whose time is between 0 and `tolerance_minutes`
    /// ahead of `now` (minute resolution, no wrap past midnight).
    pub fn due_now(&self, now: NaiveDateTime, tolerance_minutes: i64) -> Vec<&Medication> {
        let now_minutes = i64::from(now.hour()) * 60 + i64::from(now.minute());
        self.due_today(now)
            .into_iter()
            .filter(|m| {
                let diff = m.time.minutes_since_midnight() - now_minutes;
                (0..=tolerance_minutes).contains(&diff)
            })
            .collect()
    }

    /// Notices for everything due now, in list order.
    pub fn reminders(&self, now: NaiveDateTime, tolerance_minutes: i64) -> Vec<ReminderNotice> {
        self.due_now(now, tolerance_minutes)
            .into_iter()
            .map(ReminderNotice::for_medication)
            .collect()
    }

    fn persist(&self, medications: &[Medication]) -> Result<(), StoreError> {
        let json = serde_json::to_string(medications)
            .map_err(|e| StoreError::serialization(MEDICATIONS_KEY, e))?;
        self.storage.set(MEDICATIONS_KEY, &json)?;
        Ok(())
    }
}
