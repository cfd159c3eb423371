//! Progressive overload recommendations
//!
//! Suggests weight and reps for the next instance of a given set number by
//! comparing that set across the two most recent sessions.
//!
//! ## Decision order
//! 1. Target reps hit twice at the same weight: add a weight increment
//! 2. Target reps hit once: hold the weight and match or beat the reps
//! 3. Target reps missed: add up to two reps, never past the target
//!
//! Later sets in a workout (set 4 onward) are de-loaded 2.5% per set past the
//! third to account for fatigue.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::history::{group_by_session, in_window, HistoricalSet, SessionSets};
use crate::models::PersonalRecord;
use crate::validation::InputValidator;

/// Fewer sets than this yields a baseline recommendation
pub const MIN_HISTORY_SETS: usize = 2;

/// Largest rep jump suggested in one step
pub const MAX_REP_INCREASE: u32 = 2;

/// Sets after this one are de-loaded
pub const DELOAD_START_SET: u32 = 3;

/// Fraction of the working weight removed per set past `DELOAD_START_SET`
pub const DELOAD_PER_SET: Decimal = dec!(0.025);

/// Smallest plate step used for de-load amounts
pub const PLATE_STEP: Decimal = dec!(2.5);

/// How sure the advisor is about a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// What the recommendation is pushing on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressType {
    Weight,
    Reps,
    Maintain,
}

impl fmt::Display for ProgressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressType::Weight => write!(f, "Add weight"),
            ProgressType::Reps => write!(f, "Add reps"),
            ProgressType::Maintain => write!(f, "Maintain"),
        }
    }
}

/// Suggested next set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecommendation {
    /// Rounded to the nearest 0.5
    pub suggested_weight: Decimal,
    pub suggested_reps: u32,
    pub reasoning: String,
    pub confidence: Confidence,
    pub progress_type: ProgressType,
}

/// Advisor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadConfig {
    /// Days of history considered (default: 30)
    pub lookback_days: u32,

    /// Most recent sets kept after the window filter (default: 50)
    pub max_sets: usize,

    /// Rep target when the caller has none (default: 10)
    pub default_target_reps: u32,
}

impl Default for OverloadConfig {
    fn default() -> Self {
        OverloadConfig {
            lookback_days: 30,
            max_sets: 50,
            default_target_reps: 10,
        }
    }
}

/// Upper bound (exclusive) and weight step per tier
const INCREMENT_TIERS: [(Decimal, Decimal); 4] = [
    (dec!(50), dec!(2.5)),
    (dec!(100), dec!(5)),
    (dec!(200), dec!(5)),
    (dec!(300), dec!(10)),
];

/// Step used at and above the last tier
const TOP_INCREMENT: Decimal = dec!(10);

/// Weight step for a working weight
pub fn weight_increment(weight: Decimal) -> Decimal {
    INCREMENT_TIERS
        .iter()
        .find(|(upper, _)| weight < *upper)
        .map(|(_, step)| *step)
        .unwrap_or(TOP_INCREMENT)
}

/// Round to the nearest 0.5
pub fn round_to_half(weight: Decimal) -> Decimal {
    (weight * dec!(2)).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) / dec!(2)
}

/// Round to the nearest plate step (2.5)
pub fn round_to_plate(weight: Decimal) -> Decimal {
    (weight / PLATE_STEP).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * PLATE_STEP
}

/// Amount removed from the working weight for fatigue on later sets
pub fn fatigue_deload(weight: Decimal, set_number: u32) -> Decimal {
    if set_number <= DELOAD_START_SET {
        return Decimal::ZERO;
    }
    let sets_past = Decimal::from(set_number - DELOAD_START_SET);
    round_to_plate(weight * DELOAD_PER_SET * sets_past)
}

/// Keep one session per calendar day
///
/// Input must be newest first. Among same-day sessions the one containing
/// the target set wins, then the one with more sets, then the later one.
pub fn one_session_per_day(sessions: Vec<SessionSets>, target_set_number: u32) -> Vec<SessionSets> {
    let mut kept: Vec<SessionSets> = Vec::with_capacity(sessions.len());

    for session in sessions {
        match kept.last_mut() {
            Some(current) if current.date() == session.date() => {
                if prefer_session(&session, current, target_set_number) {
                    tracing::debug!(
                        kept = %session.session_id,
                        dropped = %current.session_id,
                        "Collapsed same-day sessions"
                    );
                    *current = session;
                }
            }
            _ => kept.push(session),
        }
    }

    kept
}

fn prefer_session(candidate: &SessionSets, current: &SessionSets, target_set_number: u32) -> bool {
    let has_target = |s: &SessionSets| s.set_number(target_set_number).is_some();
    has_target(candidate)
        .cmp(&has_target(current))
        .then(candidate.sets.len().cmp(&current.sets.len()))
        .then(candidate.completed_at.cmp(&current.completed_at))
        .then_with(|| candidate.session_id.cmp(&current.session_id))
        .is_gt()
}

/// Next-set recommender
pub struct OverloadAdvisor {
    config: OverloadConfig,
}

impl Default for OverloadAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl OverloadAdvisor {
    /// Create advisor with default configuration
    pub fn new() -> Self {
        OverloadAdvisor {
            config: OverloadConfig::default(),
        }
    }

    /// Create advisor with custom configuration
    pub fn with_config(config: OverloadConfig) -> Self {
        OverloadAdvisor { config }
    }

    pub fn config(&self) -> &OverloadConfig {
        &self.config
    }

    /// Recommend weight and reps for `target_set_number` of the next session
    ///
    /// `history` holds the exercise's completed working sets; anything
    /// outside the lookback window is ignored. A recommendation is always
    /// produced, falling back to a low-confidence baseline with too little
    /// history.
    pub fn recommend(
        &self,
        history: &[HistoricalSet],
        personal_record: Option<&PersonalRecord>,
        target_set_number: u32,
        target_reps: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<SetRecommendation> {
        InputValidator::validate_target(target_set_number, target_reps)?;
        InputValidator::validate_sets("history", history)?;

        let target_reps = target_reps.unwrap_or(self.config.default_target_reps);
        let recent = self.recent_sets(history, now);

        if recent.len() < MIN_HISTORY_SETS {
            tracing::debug!(sets = recent.len(), "Not enough history, suggesting a baseline");
            return Ok(Self::baseline(target_reps));
        }

        let sessions = one_session_per_day(group_by_session(&recent), target_set_number);
        let Some(last_session) = sessions.first() else {
            return Ok(Self::baseline(target_reps));
        };

        let Some(last) = last_session.set_number(target_set_number) else {
            return Ok(Self::session_average(last_session, target_set_number));
        };
        let previous = sessions
            .get(1)
            .and_then(|session| session.set_number(target_set_number));

        let met_target = last.reps >= target_reps;
        let repeated = previous
            .map(|prev| prev.weight == last.weight && prev.reps >= target_reps)
            .unwrap_or(false);

        let (mut weight, reps, progress_type, mut reasoning) = if met_target && repeated {
            let increment = weight_increment(last.weight);
            (
                last.weight + increment,
                target_reps,
                ProgressType::Weight,
                format!(
                    "You hit {} reps at {} in your last two sessions. Add {} and aim for {} reps.",
                    target_reps,
                    last.weight.normalize(),
                    increment.normalize(),
                    target_reps
                ),
            )
        } else if met_target {
            (
                last.weight,
                last.reps,
                ProgressType::Maintain,
                format!(
                    "You hit {} reps at {} last time. Match or beat that before adding weight.",
                    last.reps,
                    last.weight.normalize()
                ),
            )
        } else {
            let reps = last.reps.saturating_add(MAX_REP_INCREASE).min(target_reps);
            (
                last.weight,
                reps,
                ProgressType::Reps,
                format!(
                    "You got {} of {} reps at {}. Aim for {} reps at the same weight.",
                    last.reps,
                    target_reps,
                    last.weight.normalize(),
                    reps
                ),
            )
        };

        tracing::debug!(
            set_number = target_set_number,
            last_weight = %last.weight,
            last_reps = last.reps,
            %progress_type,
            "Chose progression branch"
        );

        let deload = fatigue_deload(weight, target_set_number);
        if deload > Decimal::ZERO {
            weight = (weight - deload).max(Decimal::ZERO);
            reasoning.push_str(&format!(
                " Reduced by {} for fatigue on set {}.",
                deload.normalize(),
                target_set_number
            ));
        }

        let weight = round_to_half(weight);
        if personal_record.is_some_and(|pr| pr.is_beaten_by(weight, reps)) {
            reasoning.push_str(" This would be a new personal record!");
        }

        Ok(SetRecommendation {
            suggested_weight: weight,
            suggested_reps: reps,
            reasoning,
            confidence: Confidence::High,
            progress_type,
        })
    }

    /// Sets inside the window, newest first, capped at `max_sets`
    fn recent_sets(&self, history: &[HistoricalSet], now: DateTime<Utc>) -> Vec<HistoricalSet> {
        let mut recent: Vec<HistoricalSet> = history
            .iter()
            .filter(|set| in_window(set.completed_at, now, self.config.lookback_days))
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        recent.truncate(self.config.max_sets);
        recent
    }

    fn baseline(target_reps: u32) -> SetRecommendation {
        SetRecommendation {
            suggested_weight: Decimal::ZERO,
            suggested_reps: target_reps,
            reasoning: "Not enough history yet. Pick a comfortable weight to establish a baseline."
                .to_string(),
            confidence: Confidence::Low,
            progress_type: ProgressType::Maintain,
        }
    }

    /// Average of the last session when the requested set was not logged
    fn session_average(session: &SessionSets, target_set_number: u32) -> SetRecommendation {
        let count = Decimal::from(session.sets.len().max(1));
        let total_weight: Decimal = session.sets.iter().map(|set| set.weight).sum();
        let total_reps: u64 = session.sets.iter().map(|set| u64::from(set.reps)).sum();

        let weight = round_to_half(total_weight / count);
        let reps = (Decimal::from(total_reps) / count)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0);

        SetRecommendation {
            suggested_weight: weight,
            suggested_reps: reps,
            reasoning: format!(
                "No set {} in your last session. Based on its average of {} x {}.",
                target_set_number,
                weight.normalize(),
                reps
            ),
            confidence: Confidence::Medium,
            progress_type: ProgressType::Maintain,
        }
    }
}
