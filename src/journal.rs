//! Mood journal — append-only log of mood check-ins.
//!
//! Entries are persisted newest-first and never edited or deleted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::{ClientStorage, MOOD_ENTRIES_KEY};
use crate::error::StoreError;
use crate::models::{Mood, MoodEntry};

/// Stored in place of a blank context.
pub const NO_CONTEXT: &str = "No additional context provided";

pub struct MoodLogStore {
    storage: Arc<dyn ClientStorage>,
    entries: Vec<MoodEntry>,
    load_error: Option<StoreError>,
}

impl MoodLogStore {
    pub fn open(storage: Arc<dyn ClientStorage>) -> Result<Self, StoreError> {
        let (entries, load_error) = match storage.get(MOOD_ENTRIES_KEY)? {
            None => (Vec::new(), None),
            Some(raw) => match serde_json::from_str::<Vec<MoodEntry>>(&raw) {
                Ok(entries) => (entries, None),
                Err(e) => {
                    tracing::warn!(error = %e, "Mood log unreadable, starting empty");
                    (Vec::new(), Some(StoreError::serialization(MOOD_ENTRIES_KEY, e)))
                }
            },
        };
        Ok(Self {
            storage,
            entries,
            load_error,
        })
    }

    pub fn load_error(&self) -> Option<&StoreError> {
        self.load_error.as_ref()
    }

    /// Records a check-in stamped with the current time.
    pub fn append(
        &mut self,
        mood: Mood,
        context: &str,
        response: &str,
    ) -> Result<MoodEntry, StoreError> {
        self.append_at(mood, context, response, Utc::now())
    }

    pub fn append_at(
        &mut self,
        mood: Mood,
        context: &str,
        response: &str,
        created_at: DateTime<Utc>,
    ) -> Result<MoodEntry, StoreError> {
        let context = context.trim();
        let entry = MoodEntry {
            id: Uuid::new_v4().to_string(),
            created_at,
            mood,
            context: if context.is_empty() {
                NO_CONTEXT.to_string()
            } else {
                context.to_string()
            },
            response: response.to_string(),
        };

        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(entry.clone());
        next.extend(self.entries.iter().cloned());

        let json = serde_json::to_string(&next)
            .map_err(|e| StoreError::serialization(MOOD_ENTRIES_KEY, e))?;
        self.storage.set(MOOD_ENTRIES_KEY, &json)?;
        self.entries = next;

        tracing::info!(entry_id = %entry.id, mood = %mood, "Mood entry recorded");
        Ok(entry)
    }

    /// All entries, newest first.
    pub fn list(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&MoodEntry> {
        self.entries.first()
    }
}

/// Supportive response used when the text service is unavailable.
pub fn fallback_response(mood: Mood) -> String {
    let mood = mood.as_str();
    format!(
        "I understand you're feeling {mood} today. It's completely valid to feel this way, \
and I appreciate you sharing this with me.

When we're feeling {mood}, it can be helpful to acknowledge these emotions without judgment. \
Your feelings are important signals that help you understand yourself better.

Here are a couple of gentle suggestions that might help:

1. Take a few moments for some deep breathing - just 5 minutes of slow, intentional breaths \
can help create a sense of calm.

2. Consider engaging in a small activity that usually brings you joy or comfort, even if it's \
just for a short time.

Remember that emotions are temporary states, not permanent conditions. Be kind to yourself \
today, just as you would be to a good friend experiencing the same feelings."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use chrono::TimeZone;

    fn store() -> MoodLogStore {
        MoodLogStore::open(Arc::new(MemoryStorage::new())).unwrap()
    }

    #[test]
    fn list_is_newest_first() {
        let mut store = store();
        let a = store.append(Mood::Happy, "Good sleep", "Great!").unwrap();
        let b = store.append(Mood::Tired, "Long day", "Rest up.").unwrap();
        let ids: Vec<_> = store.list().iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn blank_context_gets_placeholder() {
        let mut store = store();
        let entry = store.append(Mood::Neutral, "   ", "ok").unwrap();
        assert_eq!(entry.context, NO_CONTEXT);
    }

    #[test]
    fn append_at_keeps_supplied_timestamp() {
        let mut store = store();
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap();
        let entry = store.append_at(Mood::Sad, "rain", "hugs", at).unwrap();
        assert_eq!(entry.created_at, at);
        assert_eq!(store.latest().unwrap().created_at, at);
    }

    #[test]
    fn persisted_with_date_field() {
        let storage: Arc<dyn ClientStorage> = Arc::new(MemoryStorage::new());
        let mut store = MoodLogStore::open(Arc::clone(&storage)).unwrap();
        store.append(Mood::Anxious, "exam", "breathe").unwrap();

        let raw = storage.get(MOOD_ENTRIES_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json[0].get("date").is_some());
        assert_eq!(json[0]["mood"], "anxious");

        let reopened = MoodLogStore::open(storage).unwrap();
        assert_eq!(reopened.list(), store.list());
    }

    #[test]
    fn corrupt_snapshot_starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(MOOD_ENTRIES_KEY, "nope").unwrap();
        let store = MoodLogStore::open(storage).unwrap();
        assert!(store.list().is_empty());
        assert!(store.load_error().is_some());
    }

    #[test]
    fn fallback_mentions_mood() {
        let text = fallback_response(Mood::Stressed);
        assert!(text.starts_with("I understand you're feeling stressed today."));
        assert!(text.contains("deep breathing"));
    }
}
