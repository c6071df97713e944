//! Arogya command-line interface.
//!
//! Usage:
//! ```bash
//! arogya profile set-basic --name Asha --age 34 --height 160 --weight 70
//! arogya profile set-history --condition asthma --allergies Penicillin
//! arogya profile set-lifestyle --exercise light --sleep 7-8
//! arogya bmi
//! arogya meds add --name Metformin --dosage 500mg --time 08:00
//! arogya meds add --name Vitamin-D --dosage 1000IU --time 09:00 --frequency custom --days monday,thursday
//! arogya meds due
//! arogya mood log anxious --context "exam tomorrow"
//! arogya digest --out health.pdf
//! arogya ask simplify "idiopathic hypertension"
//! arogya ask report --file report.txt
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::{Parser, Subcommand};

use arogya_lib::ai::{self, SupportedLanguage};
use arogya_lib::commands::ask::AskKind;
use arogya_lib::commands::digest::DigestTarget;
use arogya_lib::commands::profile::{BasicInfoUpdate, HistoryUpdate, LifestyleUpdate, VitalsUpdate};
use arogya_lib::commands::{self, CommandResult};
use arogya_lib::config;
use arogya_lib::models::{
    Alcohol, Diet, Exercise, Frequency, Mood, NewMedication, SleepHours, Smoking, Weekday,
};
use arogya_lib::HealthSession;

#[derive(Parser)]
#[command(
    name = "arogya",
    version,
    about = "Arogya personal health companion",
    long_about = "Keep a health profile, medication reminders and a mood journal, and print a health digest."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Data directory override (defaults to $AROGYA_DATA_DIR or ~/Arogya)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Language for generated text (code or name, e.g. "ta" or "Tamil")
    #[arg(long, global = true, default_value = "en")]
    lang: SupportedLanguage,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Health profile commands
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Show BMI computed from the stored height and weight
    Bmi,

    /// Medication reminder commands
    Meds {
        #[command(subcommand)]
        action: MedsCommand,
    },

    /// Mood journal commands
    Mood {
        #[command(subcommand)]
        action: MoodCommand,
    },

    /// Generate the printable health digest (PDF)
    Digest {
        /// Output file (defaults to the exports directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Ask the text service for insights on the stored profile
    Insights,

    /// Ask the assistant: report, alternatives, simplify or chat
    Ask {
        tool: AskKind,

        /// Question, medicine name or text to explain
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print the raw response document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the emergency card and its share link
    Card {
        /// Origin for the share link
        #[arg(long, default_value = config::DEFAULT_SHARE_ORIGIN)]
        origin: String,

        /// Also write the card's QR code as SVG to this file
        #[arg(long)]
        qr: Option<PathBuf>,
    },

    /// Show the emergency card encoded in a share-link token
    CardView { token: String },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Print the stored profile
    Show,

    /// Set personal information; omitted fields keep their stored value
    SetBasic {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        /// Height in cm
        #[arg(long)]
        height: Option<String>,
        /// Weight in kg
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        blood_type: Option<String>,
    },

    /// Set vital signs; omitted fields keep their stored value
    SetVitals {
        /// systolic/diastolic, e.g. 120/80
        #[arg(long)]
        blood_pressure: Option<String>,
        /// bpm
        #[arg(long)]
        heart_rate: Option<String>,
        /// mg/dL
        #[arg(long)]
        blood_sugar: Option<String>,
        /// mg/dL
        #[arg(long)]
        cholesterol: Option<String>,
    },

    /// Set medical history; each --condition toggles that tag on or off
    SetHistory {
        /// diabetes, hypertension, asthma, heart-disease, cancer,
        /// arthritis, thyroid, depression (repeatable)
        #[arg(long = "condition")]
        conditions: Vec<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        medications: Option<String>,
        #[arg(long)]
        surgeries: Option<String>,
    },

    /// Set lifestyle habits; omitted fields keep their stored value
    SetLifestyle {
        /// never, former, occasional or regular
        #[arg(long)]
        smoking: Option<Smoking>,
        /// never, occasional, moderate or heavy
        #[arg(long)]
        alcohol: Option<Alcohol>,
        /// sedentary, light, moderate, active or very-active
        #[arg(long)]
        exercise: Option<Exercise>,
        /// balanced, vegetarian, vegan, keto, paleo, mediterranean or unhealthy
        #[arg(long)]
        diet: Option<Diet>,
        /// <5, 5-6, 7-8 or 9+
        #[arg(long)]
        sleep: Option<SleepHours>,
    },

    /// Replace the profile with a JSON document
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum MedsCommand {
    /// List all reminders
    List,

    /// Reminders scheduled for today
    Today,

    /// Reminders due within the next few minutes
    Due,

    /// Add a reminder
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        dosage: String,
        /// Time of day, HH:MM (24-hour)
        #[arg(long)]
        time: String,
        /// daily or custom
        #[arg(long, default_value = "daily")]
        frequency: Frequency,
        /// Weekdays for custom frequency, comma-separated
        #[arg(long, value_delimiter = ',')]
        days: Vec<Weekday>,
    },

    /// Remove a reminder by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum MoodCommand {
    /// Record how you feel
    Log {
        /// happy, neutral, sad, anxious, stressed or tired
        mood: Mood,
        #[arg(long, default_value = "")]
        context: String,
    },

    /// Show past entries, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn run(cli: Cli) -> CommandResult {
    let data_dir = cli.data_dir.unwrap_or_else(config::app_data_dir);
    let mut session = HealthSession::open(&config::database_path(&data_dir))?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let now = Local::now().naive_local();

    match cli.command {
        Command::Profile { action } => match action {
            ProfileCommand::Show => commands::profile::show(&session, &mut out)?,
            ProfileCommand::SetBasic {
                name,
                age,
                gender,
                height,
                weight,
                blood_type,
            } => {
                let update = BasicInfoUpdate {
                    name,
                    age,
                    gender,
                    height,
                    weight,
                    blood_type,
                };
                commands::profile::set_basic(&session, update, &mut out)?;
            }
            ProfileCommand::SetVitals {
                blood_pressure,
                heart_rate,
                blood_sugar,
                cholesterol,
            } => {
                let update = VitalsUpdate {
                    blood_pressure,
                    heart_rate,
                    blood_sugar,
                    cholesterol,
                };
                commands::profile::set_vitals(&session, update, &mut out)?;
            }
            ProfileCommand::SetHistory {
                conditions,
                allergies,
                medications,
                surgeries,
            } => {
                let update = HistoryUpdate {
                    toggle_conditions: conditions,
                    allergies,
                    medications,
                    surgeries,
                };
                commands::profile::set_history(&session, update, &mut out)?;
            }
            ProfileCommand::SetLifestyle {
                smoking,
                alcohol,
                exercise,
                diet,
                sleep,
            } => {
                let update = LifestyleUpdate {
                    smoking,
                    alcohol,
                    exercise,
                    diet,
                    sleep,
                };
                commands::profile::set_lifestyle(&session, update, &mut out)?;
            }
            ProfileCommand::Import { file } => {
                commands::profile::import(&session, &file, &mut out)?;
            }
        },
        Command::Bmi => commands::profile::bmi(&session, &mut out)?,
        Command::Meds { action } => match action {
            MedsCommand::List => commands::medications::list(&session, &mut out)?,
            MedsCommand::Today => commands::medications::today(&session, now, &mut out)?,
            MedsCommand::Due => commands::medications::due(&session, now, &mut out)?,
            MedsCommand::Add {
                name,
                dosage,
                time,
                frequency,
                days,
            } => {
                let input = NewMedication {
                    name,
                    dosage,
                    frequency,
                    time,
                    days,
                };
                commands::medications::add(&mut session, input, &mut out)?;
            }
            MedsCommand::Remove { id } => {
                commands::medications::remove(&mut session, &id, &mut out)?;
            }
        },
        Command::Mood { action } => match action {
            MoodCommand::Log { mood, context } => {
                let service = ai::narrative_service_from_env();
                commands::journal::log(
                    &mut session,
                    &*service,
                    mood,
                    &context,
                    cli.lang,
                    &mut out,
                )?;
            }
            MoodCommand::List { limit } => commands::journal::list(&session, limit, &mut out)?,
        },
        Command::Digest { out: file } => {
            let service = ai::narrative_service_from_env();
            let target = match &file {
                Some(path) => DigestTarget::File(path),
                None => DigestTarget::Exports(&data_dir),
            };
            commands::digest::digest(
                &session,
                &*service,
                cli.lang,
                now.date(),
                target,
                &mut out,
            )?;
        }
        Command::Insights => {
            let service = ai::narrative_service_from_env();
            commands::digest::insights(&session, &*service, cli.lang, &mut out)?;
        }
        Command::Ask {
            tool,
            text,
            file,
            json,
        } => {
            let text = commands::ask::read_input(text, file.as_deref())?;
            let service = ai::narrative_service_from_env();
            commands::ask::ask(&*service, tool, &text, cli.lang, json, &mut out)?;
        }
        Command::Card { origin, qr } => {
            commands::profile::card(&session, &origin, qr.as_deref(), &mut out)?;
        }
        Command::CardView { token } => commands::profile::card_view(&token, &mut out)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    arogya_lib::init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
