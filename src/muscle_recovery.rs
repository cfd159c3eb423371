//! Per-muscle recovery model
//!
//! Tracks when each muscle group was last loaded and classifies it as fresh,
//! recovering or fatigued relative to an optimal recovery time.
//!
//! ## Recovery Time
//!
//! Every muscle has a base recovery time in days. Large, eccentric-heavy
//! groups (quadriceps, hamstrings) need longer than small or postural ones
//! (calves, core). The base time is scaled by the athlete's experience and
//! goal:
//!
//! - Beginners recover slower (x1.3), advanced lifters faster (x0.8)
//! - Strength-focused training is more neurally demanding (x1.2)
//!
//! ## Classification
//!
//! - **Fresh**: at least 1.5x the optimal recovery time has passed
//! - **Recovering**: between 1x (inclusive) and 1.5x
//! - **Fatigued**: less than the optimal recovery time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::models::{ExperienceLevel, FitnessGoal, FitnessProfile, WorkoutSession};
use crate::validation::InputValidator;

/// Base recovery time in days for each tracked muscle group
pub const BASE_RECOVERY_DAYS: [(&str, f64); 14] = [
    ("chest", 2.0),
    ("back", 2.0),
    ("lats", 2.0),
    ("traps", 2.0),
    ("shoulders", 2.0),
    ("biceps", 2.0),
    ("triceps", 2.0),
    ("forearms", 1.0),
    ("quadriceps", 3.0),
    ("hamstrings", 3.0),
    ("glutes", 2.0),
    ("calves", 1.0),
    ("core", 1.0),
    ("abs", 1.0),
];

/// Recovery time for muscles missing from the table
pub const DEFAULT_RECOVERY_DAYS: f64 = 2.0;

pub const BEGINNER_RECOVERY_MULTIPLIER: f64 = 1.3;
pub const INTERMEDIATE_RECOVERY_MULTIPLIER: f64 = 1.0;
pub const ADVANCED_RECOVERY_MULTIPLIER: f64 = 0.8;

/// Heavy low-rep work taxes recovery beyond what volume suggests
pub const STRENGTH_GOAL_RECOVERY_MULTIPLIER: f64 = 1.2;

/// Multiple of the optimal recovery time after which a muscle counts as fresh
pub const FRESH_RECOVERY_RATIO: f64 = 1.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Recovery state of a single muscle group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleState {
    Fresh,
    Recovering,
    Fatigued,
}

impl MuscleState {
    /// Classify elapsed time against the adjusted recovery time
    pub fn classify(days_since: f64, optimal_recovery_days: f64) -> Self {
        if days_since >= optimal_recovery_days * FRESH_RECOVERY_RATIO {
            MuscleState::Fresh
        } else if days_since >= optimal_recovery_days {
            MuscleState::Recovering
        } else {
            MuscleState::Fatigued
        }
    }
}

impl fmt::Display for MuscleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MuscleState::Fresh => write!(f, "Fresh"),
            MuscleState::Recovering => write!(f, "Recovering"),
            MuscleState::Fatigued => write!(f, "Fatigued"),
        }
    }
}

/// Recovery status for one muscle group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleRecoveryStatus {
    /// Normalised muscle name (trimmed, lowercase)
    pub muscle: String,

    pub status: MuscleState,

    /// Days since the muscle was last trained, one decimal
    pub days_since_trained: f64,

    /// Recovery time after experience and goal adjustments
    pub optimal_recovery_days: f64,

    pub last_trained: DateTime<Utc>,
}

/// Base recovery time for a muscle name
pub fn base_recovery_days(muscle: &str) -> f64 {
    let key = normalize_muscle(muscle);
    BASE_RECOVERY_DAYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, days)| *days)
        .unwrap_or(DEFAULT_RECOVERY_DAYS)
}

/// Combined experience and goal multiplier; always positive
pub fn recovery_multiplier(profile: Option<&FitnessProfile>) -> f64 {
    let Some(profile) = profile else {
        return INTERMEDIATE_RECOVERY_MULTIPLIER;
    };

    let experience = match profile.experience_level {
        ExperienceLevel::Beginner => BEGINNER_RECOVERY_MULTIPLIER,
        ExperienceLevel::Intermediate => INTERMEDIATE_RECOVERY_MULTIPLIER,
        ExperienceLevel::Advanced => ADVANCED_RECOVERY_MULTIPLIER,
    };
    let goal = match profile.fitness_goal {
        FitnessGoal::Strength => STRENGTH_GOAL_RECOVERY_MULTIPLIER,
        _ => 1.0,
    };

    experience * goal
}

pub(crate) fn normalize_muscle(muscle: &str) -> String {
    muscle.trim().to_lowercase()
}

/// Most recent training time per muscle (primary or secondary)
///
/// Only exercises with at least one completed set count. Sessions after
/// `now` are ignored.
pub fn last_trained_by_muscle<'a, I>(sessions: I, now: DateTime<Utc>) -> BTreeMap<String, DateTime<Utc>>
where
    I: IntoIterator<Item = &'a WorkoutSession>,
{
    let mut last_trained: BTreeMap<String, DateTime<Utc>> = BTreeMap::new();

    for session in sessions {
        if session.completed_at > now {
            continue;
        }

        for entry in session.exercises.iter().filter(|e| e.has_completed_sets()) {
            for muscle in entry.muscles() {
                let key = normalize_muscle(muscle);
                if key.is_empty() {
                    continue;
                }
                last_trained
                    .entry(key)
                    .and_modify(|at| *at = (*at).max(session.completed_at))
                    .or_insert(session.completed_at);
            }
        }
    }

    last_trained
}

/// Derives per-muscle recovery from training history
pub struct MuscleRecoveryModel;

impl MuscleRecoveryModel {
    /// Recovery status for every muscle trained in `sessions`
    ///
    /// Sorted by ascending days since trained; muscles never trained are
    /// absent rather than reported as unknown.
    pub fn analyze(
        sessions: &[WorkoutSession],
        profile: Option<&FitnessProfile>,
        now: DateTime<Utc>,
    ) -> Result<Vec<MuscleRecoveryStatus>> {
        InputValidator::validate_sessions(sessions)?;
        if let Some(profile) = profile {
            InputValidator::validate_profile(profile)?;
        }
        Ok(Self::compute(sessions, profile, now))
    }

    pub(crate) fn compute<'a, I>(
        sessions: I,
        profile: Option<&FitnessProfile>,
        now: DateTime<Utc>,
    ) -> Vec<MuscleRecoveryStatus>
    where
        I: IntoIterator<Item = &'a WorkoutSession>,
    {
        let multiplier = recovery_multiplier(profile);

        let mut statuses: Vec<MuscleRecoveryStatus> = last_trained_by_muscle(sessions, now)
            .into_iter()
            .map(|(muscle, last_trained)| {
                let days_since = (now - last_trained).num_seconds() as f64 / SECONDS_PER_DAY;
                let optimal = base_recovery_days(&muscle) * multiplier;

                MuscleRecoveryStatus {
                    status: MuscleState::classify(days_since, optimal),
                    days_since_trained: round_to(days_since, 1),
                    optimal_recovery_days: round_to(optimal, 2),
                    last_trained,
                    muscle,
                }
            })
            .collect();

        // Muscle names are unique, so ties on days resolve deterministically
        statuses.sort_by(|a, b| {
            a.days_since_trained
                .total_cmp(&b.days_since_trained)
                .then_with(|| a.muscle.cmp(&b.muscle))
        });

        tracing::debug!(muscles = statuses.len(), multiplier, "Computed muscle recovery");

        statuses
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseEntry, SetRecord, SetType};
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap()
    }

    fn session(id: &str, completed_at: DateTime<Utc>, primary: &[&str], secondary: &[&str]) -> WorkoutSession {
        WorkoutSession {
            id: id.to_string(),
            completed_at,
            exercises: vec![ExerciseEntry {
                exercise_id: format!("{}-ex", id),
                name: "Exercise".to_string(),
                primary_muscles: primary.iter().map(|m| m.to_string()).collect(),
                secondary_muscles: secondary.iter().map(|m| m.to_string()).collect(),
                sets: vec![SetRecord {
                    weight: dec!(100),
                    reps: 8,
                    set_number: 1,
                    is_completed: true,
                    set_type: SetType::Normal,
                    completed_at: None,
                }],
            }],
        }
    }

    #[test]
    fn test_exact_recovery_time_is_recovering() {
        let sessions = vec![session("s1", now() - Duration::days(3), &["quadriceps"], &[])];
        let statuses = MuscleRecoveryModel::analyze(&sessions, None, now()).unwrap();

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].status, MuscleState::Recovering);
        assert_eq!(statuses[0].days_since_trained, 3.0);
        assert_eq!(statuses[0].optimal_recovery_days, 3.0);
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(MuscleState::classify(1.9, 2.0), MuscleState::Fatigued);
        assert_eq!(MuscleState::classify(2.0, 2.0), MuscleState::Recovering);
        assert_eq!(MuscleState::classify(2.9, 2.0), MuscleState::Recovering);
        assert_eq!(MuscleState::classify(3.0, 2.0), MuscleState::Fresh);
    }

    #[test]
    fn test_most_recent_date_wins_and_secondary_muscles_count() {
        let sessions = vec![
            session("old", now() - Duration::days(6), &["chest"], &["triceps"]),
            session("new", now() - Duration::hours(12), &["triceps"], &[]),
        ];
        let statuses = MuscleRecoveryModel::analyze(&sessions, None, now()).unwrap();

        assert_eq!(statuses.len(), 2);
        // Ascending days since trained
        assert_eq!(statuses[0].muscle, "triceps");
        assert_eq!(statuses[0].days_since_trained, 0.5);
        assert_eq!(statuses[0].status, MuscleState::Fatigued);
        assert_eq!(statuses[1].muscle, "chest");
        assert_eq!(statuses[1].status, MuscleState::Fresh);
    }

    #[test]
    fn test_profile_multipliers_compose() {
        let beginner_strength = FitnessProfile {
            experience_level: ExperienceLevel::Beginner,
            fitness_goal: FitnessGoal::Strength,
            ..Default::default()
        };
        assert!((recovery_multiplier(Some(&beginner_strength)) - 1.56).abs() < 1e-9);

        let advanced = FitnessProfile {
            experience_level: ExperienceLevel::Advanced,
            ..Default::default()
        };
        assert!((recovery_multiplier(Some(&advanced)) - 0.8).abs() < 1e-9);
        assert_eq!(recovery_multiplier(None), 1.0);

        // 3 days for quads becomes 3.9 for a beginner, so day 3 is still fatigued
        let sessions = vec![session("s1", now() - Duration::days(3), &["Quadriceps "], &[])];
        let beginner = FitnessProfile {
            experience_level: ExperienceLevel::Beginner,
            ..Default::default()
        };
        let statuses = MuscleRecoveryModel::analyze(&sessions, Some(&beginner), now()).unwrap();
        assert_eq!(statuses[0].muscle, "quadriceps");
        assert_eq!(statuses[0].optimal_recovery_days, 3.9);
        assert_eq!(statuses[0].status, MuscleState::Fatigued);
    }

    #[test]
    fn test_untrained_and_unknown_muscles() {
        let mut skipped = session("skip", now() - Duration::days(1), &["chest"], &[]);
        skipped.exercises[0].sets[0].is_completed = false;
        let sessions = vec![skipped, session("s2", now() - Duration::days(1), &["serratus"], &[])];

        let statuses = MuscleRecoveryModel::analyze(&sessions, None, now()).unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].muscle, "serratus");
        assert_eq!(statuses[0].optimal_recovery_days, DEFAULT_RECOVERY_DAYS);
    }

    #[test]
    fn test_table_has_fourteen_positive_entries() {
        assert_eq!(BASE_RECOVERY_DAYS.len(), 14);
        assert!(BASE_RECOVERY_DAYS.iter().all(|(_, days)| *days > 0.0));
        assert_eq!(base_recovery_days("Calves"), 1.0);
    }
}
