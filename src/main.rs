use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use liftrs::history::{exercise_histories, personal_record};
use liftrs::{
    init_logging, AppConfig, DailyCheckin, FitnessProfile, LiftRsError, MuscleState,
    OverallRecovery, OverloadAdvisor, PersonalRecord, PlateauAlert, PlateauDetector, PlateauSeverity,
    RecoveryScorer, RecoveryStatus, SetRecommendation, WorkoutSession,
};

/// liftrs - Strength Training Analytics CLI
///
/// Reads workout history exported as JSON and reports recovery readiness,
/// stalled exercises and next-set targets.
#[derive(Parser)]
#[command(name = "liftrs")]
#[command(author = "liftrs Contributors")]
#[command(version)]
#[command(about = "Strength training analytics CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Evaluate as of this instant (RFC 3339) instead of the current time
    #[arg(long, value_name = "TIMESTAMP", global = true)]
    now: Option<DateTime<Utc>>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score today's readiness to train
    Recovery {
        /// Workout sessions (JSON array)
        #[arg(short, long)]
        sessions: PathBuf,

        /// Today's wellness check-in (JSON object)
        #[arg(long)]
        checkin: Option<PathBuf>,

        /// Fitness profile (JSON object)
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },

    /// List exercises that have stopped progressing
    Plateaus {
        /// Workout sessions (JSON array)
        #[arg(short, long)]
        sessions: PathBuf,

        /// Only check this exercise id
        #[arg(short, long)]
        exercise: Option<String>,
    },

    /// Recommend weight and reps for the next set
    Recommend {
        /// Workout sessions (JSON array)
        #[arg(short, long)]
        sessions: PathBuf,

        /// Exercise id
        #[arg(short, long)]
        exercise: String,

        /// Set number within the exercise
        #[arg(long, default_value = "1")]
        set: u32,

        /// Target reps (config default when omitted)
        #[arg(short, long)]
        reps: Option<u32>,

        /// Personal record (JSON object); derived from history when omitted
        #[arg(long)]
        pr: Option<PathBuf>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,

        /// Print the config file location
        #[arg(long)]
        path: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    run(cli).map_err(|err| {
        if let Some(engine_err) = err.downcast_ref::<LiftRsError>() {
            if engine_err.severity().to_tracing_level() == tracing::Level::WARN {
                tracing::warn!(error = %engine_err, "Rejected input");
            } else {
                tracing::error!(error = %engine_err, "Analysis failed");
            }
            eprintln!("{} {}", "Error:".red().bold(), engine_err.user_message());
        }
        err
    })
}

fn run(cli: Cli) -> Result<()> {
    let initializing = matches!(cli.command, Commands::Config { init: true, .. });
    let mut config = match &cli.config {
        Some(path) if initializing && !path.exists() => AppConfig::default(),
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };
    config.logging.level = config.logging.level.raised_by(cli.verbose);
    init_logging(&config.logging)?;

    // Captured once so every analyzer sees the same instant
    let now = cli.now.unwrap_or_else(Utc::now);
    tracing::debug!(%now, "Evaluation time");

    match cli.command {
        Commands::Recovery {
            sessions,
            checkin,
            profile,
        } => {
            let sessions: Vec<WorkoutSession> = read_json(&sessions)?;
            let checkin: Option<DailyCheckin> = checkin.as_deref().map(read_json).transpose()?;
            let profile: Option<FitnessProfile> = profile.as_deref().map(read_json).transpose()?;

            let status = RecoveryScorer::with_config(config.recovery.clone()).score(
                &sessions,
                checkin.as_ref(),
                profile.as_ref(),
                now,
            )?;

            if cli.json {
                print_json(&status)?;
            } else {
                print_recovery(&status);
            }
        }

        Commands::Plateaus { sessions, exercise } => {
            let sessions: Vec<WorkoutSession> = read_json(&sessions)?;
            let mut histories = exercise_histories(&sessions);
            if let Some(id) = &exercise {
                histories.retain(|history| &history.exercise_id == id);
            }

            let alerts = PlateauDetector::with_config(config.plateau.clone()).detect_all(&histories, now)?;

            if cli.json {
                print_json(&alerts)?;
            } else {
                print_plateaus(&alerts, histories.len());
            }
        }

        Commands::Recommend {
            sessions,
            exercise,
            set,
            reps,
            pr,
        } => {
            let sessions: Vec<WorkoutSession> = read_json(&sessions)?;
            let sets = exercise_histories(&sessions)
                .into_iter()
                .find(|history| history.exercise_id == exercise)
                .map(|history| history.sets)
                .unwrap_or_default();

            let record: Option<PersonalRecord> = match pr.as_deref() {
                Some(path) => Some(read_json(path)?),
                None => personal_record(&sets),
            };

            let recommendation = OverloadAdvisor::with_config(config.overload.clone()).recommend(
                &sets,
                record.as_ref(),
                set,
                reps,
                now,
            )?;

            if cli.json {
                print_json(&recommendation)?;
            } else {
                print_recommendation(&exercise, set, &recommendation);
            }
        }

        Commands::Config { init, path } => {
            let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);

            if path {
                println!("{}", config_path.display());
            } else if init {
                if config_path.exists() {
                    println!("{} {}", "Config already exists:".yellow(), config_path.display());
                } else {
                    let mut fresh = AppConfig::default();
                    fresh.save_to_file(&config_path)?;
                    println!("{} {}", "✓ Wrote default config to".green(), config_path.display());
                }
            } else {
                let rendered =
                    toml::to_string_pretty(&config).context("Failed to render configuration")?;
                println!("{}", rendered);
            }
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Tabled)]
struct MuscleRow {
    #[tabled(rename = "Muscle")]
    muscle: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Days Since")]
    days_since: String,
    #[tabled(rename = "Recovery Days")]
    optimal: String,
}

fn print_recovery(status: &RecoveryStatus) {
    let headline = format!("{} ({}/100)", status.overall, status.score);
    let headline = match status.overall {
        OverallRecovery::Recovered => headline.green().bold(),
        OverallRecovery::Moderate => headline.yellow().bold(),
        OverallRecovery::Fatigued => headline.truecolor(255, 140, 0).bold(),
        OverallRecovery::Overtrained => headline.red().bold(),
    };

    println!("{} {}", "Recovery:".bold(), headline);
    println!("{} {}", "Suggested:".bold(), status.suggested_action);
    println!(
        "{} {} this week, {} day streak",
        "Workouts:".bold(),
        status.workouts_this_week,
        status.consecutive_training_days
    );
    println!();
    println!("{}", status.recommendation);

    if status.muscle_statuses.is_empty() {
        return;
    }

    let rows: Vec<MuscleRow> = status
        .muscle_statuses
        .iter()
        .map(|m| MuscleRow {
            muscle: m.muscle.clone(),
            status: m.status.to_string(),
            days_since: format!("{:.1}", m.days_since_trained),
            optimal: format!("{:.2}", m.optimal_recovery_days),
        })
        .collect();

    println!();
    println!("{}", Table::new(rows).with(Style::rounded()));

    let fatigued: Vec<&str> = status
        .muscle_statuses
        .iter()
        .filter(|m| m.status == MuscleState::Fatigued)
        .map(|m| m.muscle.as_str())
        .collect();
    if !fatigued.is_empty() {
        println!("{} {}", "Still fatigued:".red(), fatigued.join(", "));
    }
}

#[derive(Tabled)]
struct PlateauRow {
    #[tabled(rename = "Exercise")]
    exercise: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Weeks")]
    weeks: u32,
    #[tabled(rename = "Best Set")]
    best_set: String,
}

fn print_plateaus(alerts: &[PlateauAlert], exercises_checked: usize) {
    if alerts.is_empty() {
        println!(
            "{}",
            format!("✓ No plateaus across {} exercises", exercises_checked).green()
        );
        return;
    }

    let rows: Vec<PlateauRow> = alerts
        .iter()
        .map(|alert| PlateauRow {
            exercise: alert.exercise_name.clone(),
            severity: alert.severity.to_string(),
            weeks: alert.weeks_stalled,
            best_set: format!("{} x {}", alert.last_weight.normalize(), alert.last_reps),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));

    for alert in alerts {
        let title = match alert.severity {
            PlateauSeverity::Mild => alert.exercise_name.yellow().bold(),
            PlateauSeverity::Moderate => alert.exercise_name.truecolor(255, 140, 0).bold(),
            PlateauSeverity::Significant => alert.exercise_name.red().bold(),
        };
        println!();
        println!("{}", title);
        for suggestion in &alert.suggestions {
            println!("  • {}", suggestion);
        }
    }
}

fn print_recommendation(exercise: &str, set: u32, rec: &SetRecommendation) {
    println!(
        "{} set {}: {} x {}",
        exercise.bold(),
        set,
        rec.suggested_weight.normalize().to_string().cyan().bold(),
        rec.suggested_reps.to_string().cyan().bold()
    );
    println!(
        "{} {}   {} {}",
        "Progress:".bold(),
        rec.progress_type,
        "Confidence:".bold(),
        rec.confidence
    );
    println!();
    println!("{}", rec.reasoning);
}
