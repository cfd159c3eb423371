//! Readiness scoring
//!
//! Combines training frequency, consecutive-day streaks, per-muscle fatigue and
//! today's wellness check-in into a single 0-100 readiness score with a
//! suggested action.
//!
//! # Scoring
//!
//! The score starts at 100 and independent adjustments are summed before a
//! single clamp to 0..=100:
//!
//! - **Frequency**: sessions this calendar week (Monday-anchored) against the
//!   weekly target
//! - **Goal and experience**: strength and beginner lifters are penalised for
//!   long streaks, advanced lifters get a small bonus
//! - **Streak**: 3, 4 and 5+ consecutive training days
//! - **Wellness**: sleep quality and duration, stress, soreness and energy
//! - **Muscles**: fatigued and recovering groups cost points, fresh ones add
//!
//! # Bands
//!
//! | Score  | Status      | Action                         |
//! |--------|-------------|--------------------------------|
//! | 80+    | Recovered   | Train hard                     |
//! | 60-79  | Moderate    | Train hard or light            |
//! | 40-59  | Fatigued    | Active recovery                |
//! | <40    | Overtrained | Rest                           |
//!
//! Two wellness combinations override the band regardless of score: poor sleep
//! with high stress or low energy forces rest, high soreness with low energy
//! forces active recovery.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::Result;
use crate::history::sessions_within;
use crate::models::{DailyCheckin, ExperienceLevel, FitnessGoal, FitnessProfile, WorkoutSession};
use crate::muscle_recovery::{MuscleRecoveryModel, MuscleRecoveryStatus, MuscleState};
use crate::validation::InputValidator;

pub const MAX_SCORE: i32 = 100;

/// Sessions this week are capped before scoring
pub const MAX_WEEKLY_SESSIONS: u32 = 14;

// Weekly frequency tiers (first match applies)
pub const FREQUENCY_PENALTY_7_PLUS: i32 = -30;
pub const FREQUENCY_PENALTY_6: i32 = -20;
pub const FREQUENCY_PENALTY_5: i32 = -10;
/// Applies at target + 2 sessions when none of the fixed tiers matched
pub const FREQUENCY_PENALTY_OVER_TARGET: i32 = -5;
pub const OVER_TARGET_MARGIN: u32 = 2;
/// No sessions yet this week although a target is set
pub const FREQUENCY_PENALTY_NO_SESSIONS: i32 = -5;

// Goal and experience modifiers
pub const STRENGTH_STREAK_PENALTY: i32 = -15;
pub const ENDURANCE_UNDER_TARGET_BONUS: i32 = 5;
pub const BEGINNER_STREAK_PENALTY: i32 = -15;
pub const BEGINNER_WEEKLY_PENALTY: i32 = -10;
pub const BEGINNER_WEEKLY_LIMIT: u32 = 5;
pub const ADVANCED_BONUS: i32 = 5;
/// Streak length at which goal and experience streak penalties apply
pub const PROFILE_STREAK_THRESHOLD: u32 = 3;

/// Longest break between sessions that still continues a streak
pub const MAX_STREAK_GAP_DAYS: f64 = 1.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

// Consecutive-day streak penalties
pub const STREAK_PENALTY_5_PLUS: i32 = -25;
pub const STREAK_PENALTY_4: i32 = -15;
pub const STREAK_PENALTY_3: i32 = -10;

// Wellness penalties
pub const POOR_SLEEP_QUALITY_PENALTY: i32 = -15;
pub const FAIR_SLEEP_QUALITY_PENALTY: i32 = -7;
pub const SHORT_SLEEP_PENALTY: i32 = -12;
pub const SLIGHTLY_SHORT_SLEEP_PENALTY: i32 = -6;
pub const HIGH_STRESS_PENALTY: i32 = -12;
pub const MODERATE_STRESS_PENALTY: i32 = -5;
pub const HIGH_SORENESS_PENALTY: i32 = -15;
pub const MODERATE_SORENESS_PENALTY: i32 = -7;
pub const LOW_ENERGY_PENALTY: i32 = -10;
pub const MODERATE_ENERGY_PENALTY: i32 = -5;

pub const SHORT_SLEEP_HOURS: f64 = 6.0;
pub const ADEQUATE_SLEEP_HOURS: f64 = 7.0;

// Per-muscle adjustments
pub const FATIGUED_MUSCLE_PENALTY: i32 = -8;
pub const RECOVERING_MUSCLE_PENALTY: i32 = -3;
pub const FRESH_MUSCLE_BONUS: i32 = 3;

// Band thresholds
pub const RECOVERED_THRESHOLD: i32 = 80;
pub const MODERATE_THRESHOLD: i32 = 60;
pub const FATIGUED_THRESHOLD: i32 = 40;

/// More fatigued muscles than this turns a moderate day into a light one
pub const MODERATE_FATIGUED_MUSCLE_LIMIT: usize = 2;

/// Muscles named in the recommendation text
pub const MAX_NAMED_MUSCLES: usize = 2;

/// Overall readiness band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallRecovery {
    Recovered,
    Moderate,
    Fatigued,
    Overtrained,
}

impl fmt::Display for OverallRecovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallRecovery::Recovered => write!(f, "Recovered"),
            OverallRecovery::Moderate => write!(f, "Moderate"),
            OverallRecovery::Fatigued => write!(f, "Fatigued"),
            OverallRecovery::Overtrained => write!(f, "Overtrained"),
        }
    }
}

/// What the athlete should do today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    TrainHard,
    TrainLight,
    ActiveRecovery,
    Rest,
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestedAction::TrainHard => write!(f, "Train hard"),
            SuggestedAction::TrainLight => write!(f, "Train light"),
            SuggestedAction::ActiveRecovery => write!(f, "Active recovery"),
            SuggestedAction::Rest => write!(f, "Rest"),
        }
    }
}

/// Readiness result for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryStatus {
    pub overall: OverallRecovery,

    /// Readiness score, 0-100
    pub score: u8,

    /// Sorted by ascending days since trained
    pub muscle_statuses: Vec<MuscleRecoveryStatus>,

    pub recommendation: String,

    pub suggested_action: SuggestedAction,

    pub consecutive_training_days: u32,

    pub workouts_this_week: u32,
}

impl RecoveryStatus {
    /// Result when there is no recent training at all
    pub fn fully_recovered() -> Self {
        RecoveryStatus {
            overall: OverallRecovery::Recovered,
            score: MAX_SCORE as u8,
            muscle_statuses: Vec::new(),
            recommendation: "No recent workouts found. You're fully recovered and ready to train hard."
                .to_string(),
            suggested_action: SuggestedAction::TrainHard,
            consecutive_training_days: 0,
            workouts_this_week: 0,
        }
    }

    pub fn fatigued_muscles(&self) -> impl Iterator<Item = &MuscleRecoveryStatus> {
        self.muscle_statuses
            .iter()
            .filter(|m| m.status == MuscleState::Fatigued)
    }
}

/// Scorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Days of history considered (default: 14)
    pub lookback_days: u32,

    /// Weekly target when the profile doesn't set one (default: 4)
    pub default_weekly_target: u32,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        RecoveryConfig {
            lookback_days: 14,
            default_weekly_target: 4,
        }
    }
}

/// Individual score adjustments, summed onto the base score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreAdjustments {
    pub frequency: i32,
    pub profile: i32,
    pub streak: i32,
    pub wellness: i32,
    pub muscles: i32,
}

impl ScoreAdjustments {
    pub fn total(&self) -> i32 {
        self.frequency + self.profile + self.streak + self.wellness + self.muscles
    }

    /// Final score clamped to 0..=100
    pub fn score(&self) -> u8 {
        (MAX_SCORE + self.total()).clamp(0, MAX_SCORE) as u8
    }
}

/// Wellness conditions that drive overrides and action choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WellnessFlags {
    pub poor_sleep: bool,
    pub high_stress: bool,
    pub low_energy: bool,
    pub high_soreness: bool,
}

impl WellnessFlags {
    pub fn from_checkin(checkin: Option<&DailyCheckin>) -> Self {
        let Some(c) = checkin else {
            return WellnessFlags::default();
        };

        WellnessFlags {
            poor_sleep: c.sleep_quality <= 2 || c.sleep_hours < SHORT_SLEEP_HOURS,
            high_stress: c.stress_level >= 4,
            low_energy: c.energy_level <= 2,
            high_soreness: c.soreness_level >= 4,
        }
    }

    /// Poor sleep with high stress or low energy
    pub fn forces_rest(&self) -> bool {
        self.poor_sleep && (self.high_stress || self.low_energy)
    }

    /// High soreness with low energy
    pub fn forces_active_recovery(&self) -> bool {
        self.high_soreness && self.low_energy
    }
}

/// Frequency adjustment for the current week
pub fn frequency_adjustment(workouts_this_week: u32, weekly_target: u32) -> i32 {
    match workouts_this_week {
        n if n >= 7 => FREQUENCY_PENALTY_7_PLUS,
        6 => FREQUENCY_PENALTY_6,
        5 => FREQUENCY_PENALTY_5,
        0 if weekly_target > 0 => FREQUENCY_PENALTY_NO_SESSIONS,
        n if n >= weekly_target + OVER_TARGET_MARGIN => FREQUENCY_PENALTY_OVER_TARGET,
        _ => 0,
    }
}

/// Goal and experience modifiers
pub fn profile_adjustment(
    profile: Option<&FitnessProfile>,
    streak: u32,
    workouts_this_week: u32,
    weekly_target: u32,
) -> i32 {
    let Some(profile) = profile else {
        return 0;
    };

    let mut adjustment = 0;

    match profile.fitness_goal {
        FitnessGoal::Strength if streak >= PROFILE_STREAK_THRESHOLD => {
            adjustment += STRENGTH_STREAK_PENALTY;
        }
        FitnessGoal::Endurance if workouts_this_week < weekly_target => {
            adjustment += ENDURANCE_UNDER_TARGET_BONUS;
        }
        _ => {}
    }

    match profile.experience_level {
        ExperienceLevel::Beginner => {
            if streak >= PROFILE_STREAK_THRESHOLD {
                adjustment += BEGINNER_STREAK_PENALTY;
            }
            if workouts_this_week >= BEGINNER_WEEKLY_LIMIT {
                adjustment += BEGINNER_WEEKLY_PENALTY;
            }
        }
        ExperienceLevel::Advanced => adjustment += ADVANCED_BONUS,
        ExperienceLevel::Intermediate => {}
    }

    adjustment
}

/// Penalty for consecutive training days
pub fn streak_adjustment(streak: u32) -> i32 {
    match streak {
        n if n >= 5 => STREAK_PENALTY_5_PLUS,
        4 => STREAK_PENALTY_4,
        3 => STREAK_PENALTY_3,
        _ => 0,
    }
}

/// Tiered penalties from today's check-in
pub fn wellness_adjustment(checkin: Option<&DailyCheckin>) -> i32 {
    let Some(c) = checkin else {
        return 0;
    };

    let sleep_quality = match c.sleep_quality {
        q if q <= 2 => POOR_SLEEP_QUALITY_PENALTY,
        3 => FAIR_SLEEP_QUALITY_PENALTY,
        _ => 0,
    };
    let sleep_hours = if c.sleep_hours < SHORT_SLEEP_HOURS {
        SHORT_SLEEP_PENALTY
    } else if c.sleep_hours < ADEQUATE_SLEEP_HOURS {
        SLIGHTLY_SHORT_SLEEP_PENALTY
    } else {
        0
    };
    let stress = match c.stress_level {
        s if s >= 4 => HIGH_STRESS_PENALTY,
        3 => MODERATE_STRESS_PENALTY,
        _ => 0,
    };
    let soreness = match c.soreness_level {
        s if s >= 4 => HIGH_SORENESS_PENALTY,
        3 => MODERATE_SORENESS_PENALTY,
        _ => 0,
    };
    let energy = match c.energy_level {
        e if e <= 2 => LOW_ENERGY_PENALTY,
        3 => MODERATE_ENERGY_PENALTY,
        _ => 0,
    };

    sleep_quality + sleep_hours + stress + soreness + energy
}

/// Sum of per-muscle adjustments
pub fn muscle_adjustment(muscles: &[MuscleRecoveryStatus]) -> i32 {
    muscles
        .iter()
        .map(|m| match m.status {
            MuscleState::Fatigued => FATIGUED_MUSCLE_PENALTY,
            MuscleState::Recovering => RECOVERING_MUSCLE_PENALTY,
            MuscleState::Fresh => FRESH_MUSCLE_BONUS,
        })
        .sum()
}

/// Midnight UTC on the Monday of the week containing `now`
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    monday.and_time(NaiveTime::MIN).and_utc()
}

/// Sessions completed since Monday of the current week, capped
pub fn workouts_this_week<'a, I>(sessions: I, now: DateTime<Utc>) -> u32
where
    I: IntoIterator<Item = &'a WorkoutSession>,
{
    let start = week_start(now);
    let count = sessions
        .into_iter()
        .filter(|s| s.completed_at >= start && s.completed_at <= now)
        .count();
    (count as u32).min(MAX_WEEKLY_SESSIONS)
}

/// Unbroken run of training days ending today or yesterday
///
/// Sessions are walked newest first; a gap longer than
/// [`MAX_STREAK_GAP_DAYS`] between consecutive sessions ends the run. The
/// streak is the number of distinct calendar days inside the run.
pub fn consecutive_training_days<'a, I>(sessions: I, now: DateTime<Utc>) -> u32
where
    I: IntoIterator<Item = &'a WorkoutSession>,
{
    let mut times: Vec<DateTime<Utc>> = sessions
        .into_iter()
        .map(|s| s.completed_at)
        .filter(|at| *at <= now)
        .collect();
    times.sort_unstable_by(|a, b| b.cmp(a));

    let Some(&latest) = times.first() else {
        return 0;
    };
    if (now.date_naive() - latest.date_naive()).num_days() > 1 {
        return 0;
    }

    let mut days = BTreeSet::new();
    let mut previous = latest;
    for at in times {
        let gap_days = (previous - at).num_seconds() as f64 / SECONDS_PER_DAY;
        if gap_days > MAX_STREAK_GAP_DAYS {
            break;
        }
        days.insert(at.date_naive());
        previous = at;
    }
    days.len() as u32
}

/// Scores overall readiness from recent training and wellness
pub struct RecoveryScorer {
    config: RecoveryConfig,
}

impl Default for RecoveryScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryScorer {
    /// Create scorer with default configuration
    pub fn new() -> Self {
        RecoveryScorer {
            config: RecoveryConfig::default(),
        }
    }

    /// Create scorer with custom configuration
    pub fn with_config(config: RecoveryConfig) -> Self {
        RecoveryScorer { config }
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Compute today's readiness
    ///
    /// `sessions` may cover more than the lookback window; older sessions are
    /// ignored. With no sessions in the window the fixed fully-recovered
    /// result is returned regardless of check-in.
    pub fn score(
        &self,
        sessions: &[WorkoutSession],
        checkin: Option<&DailyCheckin>,
        profile: Option<&FitnessProfile>,
        now: DateTime<Utc>,
    ) -> Result<RecoveryStatus> {
        InputValidator::validate_sessions(sessions)?;
        if let Some(checkin) = checkin {
            InputValidator::validate_checkin(checkin)?;
        }
        if let Some(profile) = profile {
            InputValidator::validate_profile(profile)?;
        }

        let window = sessions_within(sessions, now, self.config.lookback_days);
        if window.is_empty() {
            return Ok(RecoveryStatus::fully_recovered());
        }

        let today = now.date_naive();
        let checkin = checkin.filter(|c| {
            let applies = c.applies_to(today);
            if !applies {
                tracing::warn!(checkin_date = ?c.date, %today, "Ignoring check-in for another day");
            }
            applies
        });

        let weekly_target = profile
            .and_then(|p| p.weekly_workout_target)
            .unwrap_or(self.config.default_weekly_target);

        let muscles = MuscleRecoveryModel::compute(window.iter().copied(), profile, now);
        let weekly = workouts_this_week(window.iter().copied(), now);
        let streak = consecutive_training_days(window.iter().copied(), now);

        let adjustments = ScoreAdjustments {
            frequency: frequency_adjustment(weekly, weekly_target),
            profile: profile_adjustment(profile, streak, weekly, weekly_target),
            streak: streak_adjustment(streak),
            wellness: wellness_adjustment(checkin),
            muscles: muscle_adjustment(&muscles),
        };
        let score = adjustments.score();
        let flags = WellnessFlags::from_checkin(checkin);
        let fatigued_count = muscles
            .iter()
            .filter(|m| m.status == MuscleState::Fatigued)
            .count();

        tracing::debug!(
            ?adjustments,
            score,
            weekly,
            streak,
            fatigued_count,
            "Scored readiness"
        );

        let (overall, action) = if flags.forces_rest() {
            (OverallRecovery::Overtrained, SuggestedAction::Rest)
        } else if flags.forces_active_recovery() {
            (OverallRecovery::Fatigued, SuggestedAction::ActiveRecovery)
        } else {
            band(score, streak, fatigued_count, &flags)
        };

        let mut recommendation = recommendation_text(overall, action, &flags, &muscles, profile);
        if let Some(profile) = profile {
            let training = matches!(action, SuggestedAction::TrainHard | SuggestedAction::TrainLight);
            if training && profile.is_rest_day(today.weekday()) {
                recommendation.push_str(" Today is one of your planned rest days, so it's fine to take it off.");
            }
        }

        Ok(RecoveryStatus {
            overall,
            score,
            muscle_statuses: muscles,
            recommendation,
            suggested_action: action,
            consecutive_training_days: streak,
            workouts_this_week: weekly,
        })
    }
}

/// Band a score when no wellness override applies
pub fn band(
    score: u8,
    streak: u32,
    fatigued_muscles: usize,
    flags: &WellnessFlags,
) -> (OverallRecovery, SuggestedAction) {
    let score = i32::from(score);

    if score >= RECOVERED_THRESHOLD {
        (OverallRecovery::Recovered, SuggestedAction::TrainHard)
    } else if score >= MODERATE_THRESHOLD {
        let go_light = streak >= PROFILE_STREAK_THRESHOLD
            || fatigued_muscles > MODERATE_FATIGUED_MUSCLE_LIMIT
            || flags.poor_sleep
            || flags.high_soreness;
        let action = if go_light {
            SuggestedAction::TrainLight
        } else {
            SuggestedAction::TrainHard
        };
        (OverallRecovery::Moderate, action)
    } else if score >= FATIGUED_THRESHOLD {
        (OverallRecovery::Fatigued, SuggestedAction::ActiveRecovery)
    } else {
        (OverallRecovery::Overtrained, SuggestedAction::Rest)
    }
}

fn recommendation_text(
    overall: OverallRecovery,
    action: SuggestedAction,
    flags: &WellnessFlags,
    muscles: &[MuscleRecoveryStatus],
    profile: Option<&FitnessProfile>,
) -> String {
    let tired = tired_muscles(muscles);
    let goal = profile.map(|p| p.fitness_goal);

    let mut text = match (overall, action) {
        (OverallRecovery::Overtrained, _) if flags.forces_rest() => {
            "Poor sleep combined with high stress or low energy. Take a rest day and prioritize sleep tonight."
                .to_string()
        }
        (OverallRecovery::Fatigued, _) if flags.forces_active_recovery() => {
            "High soreness and low energy today. Opt for active recovery like stretching, mobility work or an easy walk."
                .to_string()
        }
        (OverallRecovery::Recovered, _) => {
            let fresh = fresh_muscles(muscles);
            match join_names(&fresh) {
                Some(names) => format!(
                    "You're well recovered and ready for a challenging session. {} {} fully fresh.",
                    capitalize(&names),
                    if fresh.len() == 1 { "is" } else { "are" }
                ),
                None => "You're well recovered and ready for a challenging session.".to_string(),
            }
        }
        (OverallRecovery::Moderate, SuggestedAction::TrainHard) => match tired {
            Some(names) => format!(
                "Recovery is moderate. You can train normally, but go easy on {} which still need time.",
                names
            ),
            None => "Recovery is moderate. You can train normally today.".to_string(),
        },
        (OverallRecovery::Moderate, _) => match tired {
            Some(names) => format!(
                "Recovery is moderate. Keep today's session light and avoid loading {}.",
                names
            ),
            None => "Recovery is moderate. Keep today's session light.".to_string(),
        },
        (OverallRecovery::Fatigued, _) => match tired {
            Some(names) => format!(
                "Your body is showing signs of fatigue. Stick to active recovery and give {} more time.",
                names
            ),
            None => "Your body is showing signs of fatigue. Stick to active recovery such as walking or mobility work."
                .to_string(),
        },
        (OverallRecovery::Overtrained, _) => match tired {
            Some(names) => format!(
                "Signs of overtraining detected. Take a full rest day to let {} recover.",
                names
            ),
            None => "Signs of overtraining detected. Take a full rest day.".to_string(),
        },
    };

    if let Some(goal) = goal {
        text.push(' ');
        text.push_str(&goal_note(goal, action));
    }

    text
}

fn goal_note(goal: FitnessGoal, action: SuggestedAction) -> String {
    let training = matches!(action, SuggestedAction::TrainHard | SuggestedAction::TrainLight);
    match (goal, training) {
        (FitnessGoal::BuildMuscle, true) => {
            "For muscle building, focus on quality volume in the 8-12 rep range.".to_string()
        }
        (FitnessGoal::Strength, true) => {
            "For strength, keep the heavy compound lifts crisp and stop short of failure.".to_string()
        }
        (FitnessGoal::Endurance, true) => {
            "For endurance, this is a good day to build work capacity.".to_string()
        }
        (FitnessGoal::LoseFat, true) => {
            "For fat loss, pair your session with a daily step goal.".to_string()
        }
        (goal, true) => format!("Keep working toward your {} goal.", goal),
        (goal, false) => format!("Recovery is part of {} progress, not a break from it.", goal),
    }
}

/// Up to two most recently trained muscles that are not fresh
fn tired_muscles(muscles: &[MuscleRecoveryStatus]) -> Option<String> {
    let fatigued: Vec<&str> = muscles
        .iter()
        .filter(|m| m.status == MuscleState::Fatigued)
        .map(|m| m.muscle.as_str())
        .take(MAX_NAMED_MUSCLES)
        .collect();

    let names = if fatigued.is_empty() {
        muscles
            .iter()
            .filter(|m| m.status == MuscleState::Recovering)
            .map(|m| m.muscle.as_str())
            .take(MAX_NAMED_MUSCLES)
            .collect()
    } else {
        fatigued
    };

    join_names(&names)
}

/// Up to two muscles that have rested the longest
fn fresh_muscles(muscles: &[MuscleRecoveryStatus]) -> Vec<&str> {
    muscles
        .iter()
        .rev()
        .filter(|m| m.status == MuscleState::Fresh)
        .map(|m| m.muscle.as_str())
        .take(MAX_NAMED_MUSCLES)
        .collect()
}

fn join_names(names: &[&str]) -> Option<String> {
    match names {
        [] => None,
        [one] => Some(one.to_string()),
        [first, rest @ ..] => Some(format!("{} and {}", first, rest.join(" and "))),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
