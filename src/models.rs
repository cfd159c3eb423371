//! Shared history types consumed by the analytics engine
//!
//! These mirror the data contracts supplied by the storage layer: completed
//! workout sessions with their exercises and sets, plus the optional daily
//! wellness check-in and fitness profile. The engine only reads them.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Set categories as logged by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetType {
    #[default]
    Normal,
    Warmup,
    Drop,
    Failure,
}

impl SetType {
    /// Warm-up sets never count towards volume or progression
    pub fn is_working(&self) -> bool {
        !matches!(self, SetType::Warmup)
    }
}

/// A single logged set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    /// Load in the canonical unit
    pub weight: Decimal,

    /// Completed repetitions
    pub reps: u32,

    /// 1-based position of the set within the exercise
    pub set_number: u32,

    /// Whether the user ticked the set off
    pub is_completed: bool,

    #[serde(default)]
    pub set_type: SetType,

    /// Per-set timestamp; falls back to the session completion time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SetRecord {
    /// Volume of the set (weight x reps)
    pub fn volume(&self) -> Decimal {
        self.weight * Decimal::from(self.reps)
    }

    /// Only completed working sets participate in volume and progression math
    pub fn counts_toward_progress(&self) -> bool {
        self.is_completed && self.set_type.is_working()
    }
}

/// One exercise performed inside a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub exercise_id: String,

    pub name: String,

    #[serde(default)]
    pub primary_muscles: Vec<String>,

    #[serde(default)]
    pub secondary_muscles: Vec<String>,

    #[serde(default)]
    pub sets: Vec<SetRecord>,
}

impl ExerciseEntry {
    /// Primary and secondary muscles, in that order
    pub fn muscles(&self) -> impl Iterator<Item = &str> {
        self.primary_muscles
            .iter()
            .chain(self.secondary_muscles.iter())
            .map(String::as_str)
    }

    /// True if at least one set was completed
    pub fn has_completed_sets(&self) -> bool {
        self.sets.iter().any(|set| set.is_completed)
    }
}

/// A finished workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: String,

    pub completed_at: DateTime<Utc>,

    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
}

/// Self-reported wellness for today
///
/// All 1-5 scales read "higher is more": a sleep quality of 5 is great sleep,
/// a stress level of 5 is very stressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCheckin {
    /// Day the check-in refers to; `None` means "today"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    pub sleep_quality: u8,

    pub sleep_hours: f64,

    pub stress_level: u8,

    pub soreness_level: u8,

    pub energy_level: u8,
}

impl DailyCheckin {
    /// Whether this check-in applies to the given day
    pub fn applies_to(&self, day: NaiveDate) -> bool {
        self.date.map_or(true, |date| date == day)
    }
}

/// Training experience as declared by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

/// Primary training goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    BuildMuscle,
    Strength,
    LoseFat,
    Endurance,
    Maintain,
    #[default]
    GeneralFitness,
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitnessGoal::BuildMuscle => write!(f, "muscle building"),
            FitnessGoal::Strength => write!(f, "strength"),
            FitnessGoal::LoseFat => write!(f, "fat loss"),
            FitnessGoal::Endurance => write!(f, "endurance"),
            FitnessGoal::Maintain => write!(f, "maintenance"),
            FitnessGoal::GeneralFitness => write!(f, "general fitness"),
        }
    }
}

/// User preferences relevant to recovery scoring
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessProfile {
    #[serde(default)]
    pub experience_level: ExperienceLevel,

    #[serde(default)]
    pub fitness_goal: FitnessGoal,

    /// Planned workouts per week; the scorer default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_workout_target: Option<u32>,

    #[serde(default)]
    pub preferred_rest_days: Vec<Weekday>,
}

impl FitnessProfile {
    pub fn is_rest_day(&self, day: Weekday) -> bool {
        self.preferred_rest_days.contains(&day)
    }
}

/// Best recorded set for an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub weight: Decimal,
    pub reps: u32,
}

impl PersonalRecord {
    /// Whether a prospective set would beat this record
    ///
    /// Heavier always wins; at equal weight more reps wins.
    pub fn is_beaten_by(&self, weight: Decimal, reps: u32) -> bool {
        weight > self.weight || (weight == self.weight && reps > self.reps)
    }
}
