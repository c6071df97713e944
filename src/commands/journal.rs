use std::io::Write;

use chrono::{DateTime, Local, Utc};

use super::CommandResult;
use crate::ai::{NarrativeService, SupportedLanguage};
use crate::models::Mood;
use crate::session::HealthSession;

pub fn log(
    session: &mut HealthSession,
    service: &dyn NarrativeService,
    mood: Mood,
    context: &str,
    language: SupportedLanguage,
    out: &mut impl Write,
) -> CommandResult {
    let entry = session.record_mood(service, mood, context, language)?;
    writeln!(out, "Feeling {} - noted.", entry.mood.label())?;
    writeln!(out)?;
    writeln!(out, "{}", entry.response)?;
    Ok(())
}

/// Entries are stored in UTC and shown in the local time zone.
fn local_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Newest first; `limit` caps the number shown.
pub fn list(session: &HealthSession, limit: Option<usize>, out: &mut impl Write) -> CommandResult {
    if let Some(e) = session.moods().load_error() {
        writeln!(out, "Warning: saved mood entries could not be read ({e}).")?;
    }
    let entries = session.moods().list();
    if entries.is_empty() {
        writeln!(out, "No mood entries yet.")?;
    }
    for entry in entries.iter().take(limit.unwrap_or(usize::MAX)) {
        writeln!(
            out,
            "{}  {:<8}  {}",
            local_timestamp(entry.created_at),
            entry.mood.label(),
            entry.context
        )?;
    }
    Ok(())
}
