use std::io::Write;

use chrono::NaiveDateTime;

use super::CommandResult;
use crate::models::{Frequency, Medication, NewMedication};
use crate::session::HealthSession;

fn schedule(med: &Medication) -> String {
    match med.frequency {
        Frequency::Daily => format!("daily at {}", med.time),
        Frequency::Custom => {
            let days: Vec<&str> = med.days.iter().map(|d| d.label()).collect();
            format!("{} at {}", days.join(", "), med.time)
        }
    }
}

fn print_medication(med: &Medication, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}  {} ({}), {}", med.id, med.name, med.dosage, schedule(med))
}

pub fn list(session: &HealthSession, out: &mut impl Write) -> CommandResult {
    if let Some(e) = session.medications().load_error() {
        writeln!(out, "Warning: saved reminders could not be read ({e}).")?;
    }
    let meds = session.medications().list();
    if meds.is_empty() {
        writeln!(out, "No medication reminders.")?;
    }
    for med in meds {
        print_medication(med, out)?;
    }
    Ok(())
}

pub fn today(session: &HealthSession, now: NaiveDateTime, out: &mut impl Write) -> CommandResult {
    let meds = session.medications().due_today(now);
    if meds.is_empty() {
        writeln!(out, "Nothing scheduled today.")?;
    }
    for med in meds {
        print_medication(med, out)?;
    }
    Ok(())
}

pub fn due(session: &HealthSession, now: NaiveDateTime, out: &mut impl Write) -> CommandResult {
    let notices = session.reminders(now);
    if notices.is_empty() {
        writeln!(out, "No medications due right now.")?;
    }
    for notice in notices {
        writeln!(out, "[{}] {} - {}", notice.time, notice.title, notice.body)?;
    }
    Ok(())
}

pub fn add(session: &mut HealthSession, input: NewMedication, out: &mut impl Write) -> CommandResult {
    let med = session.medications_mut().add(input)?;
    writeln!(out, "Added {} ({}), {}", med.name, med.dosage, schedule(&med))?;
    writeln!(out, "id: {}", med.id)?;
    Ok(())
}

pub fn remove(session: &mut HealthSession, id: &str, out: &mut impl Write) -> CommandResult {
    session.medications_mut().remove(id)?;
    writeln!(out, "Removed reminder {id}.")?;
    Ok(())
}
