use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Mood;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    pub mood: Mood,
    pub context: String,
    pub response: String,
}
