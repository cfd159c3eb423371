//! Input shape validation
//!
//! The analyzers trust their numbers once these checks pass. Empty
//! collections are always valid.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::InputError;
use crate::history::{ExerciseHistory, HistoricalSet};
use crate::models::{DailyCheckin, FitnessProfile, WorkoutSession};

/// Lowest value on the 1-5 check-in scales
pub const CHECKIN_SCALE_MIN: u8 = 1;

/// Highest value on the 1-5 check-in scales
pub const CHECKIN_SCALE_MAX: u8 = 5;

/// More planned sessions than this per week is not a plausible target
pub const MAX_WEEKLY_TARGET: u32 = 14;

/// Heaviest load accepted for a single set
pub const MAX_WEIGHT: Decimal = dec!(10000);

/// Most reps accepted for a single set or rep target
pub const MAX_REPS: u32 = 1000;

/// Validates engine inputs before computation
pub struct InputValidator;

impl InputValidator {
    /// Validate a session list
    pub fn validate_sessions(sessions: &[WorkoutSession]) -> Result<(), InputError> {
        for session in sessions {
            if session.id.trim().is_empty() {
                return Err(InputError::MissingIdentifier {
                    field: "session id".to_string(),
                });
            }

            for entry in &session.exercises {
                if entry.exercise_id.trim().is_empty() {
                    return Err(InputError::MissingIdentifier {
                        field: format!("exercise id in session {}", session.id),
                    });
                }

                for set in &entry.sets {
                    Self::validate_weight(&entry.name, set.weight)?;
                    Self::validate_reps(&entry.name, set.reps)?;
                }
            }
        }

        Ok(())
    }

    /// Validate a flattened exercise history
    pub fn validate_history(history: &ExerciseHistory) -> Result<(), InputError> {
        if history.exercise_id.trim().is_empty() {
            return Err(InputError::MissingIdentifier {
                field: "exercise id".to_string(),
            });
        }
        Self::validate_sets(&history.exercise_name, &history.sets)
    }

    /// Validate raw historical sets
    pub fn validate_sets(context: &str, sets: &[HistoricalSet]) -> Result<(), InputError> {
        sets.iter().try_for_each(|set| {
            Self::validate_weight(context, set.weight)?;
            Self::validate_reps(context, set.reps)
        })
    }

    /// Validate today's check-in
    pub fn validate_checkin(checkin: &DailyCheckin) -> Result<(), InputError> {
        Self::validate_scale("sleep quality", checkin.sleep_quality)?;
        Self::validate_scale("stress level", checkin.stress_level)?;
        Self::validate_scale("soreness level", checkin.soreness_level)?;
        Self::validate_scale("energy level", checkin.energy_level)?;

        if !checkin.sleep_hours.is_finite() || !(0.0..=24.0).contains(&checkin.sleep_hours) {
            return Err(InputError::InvalidSleepHours {
                hours: checkin.sleep_hours,
            });
        }

        Ok(())
    }

    /// Validate the fitness profile
    pub fn validate_profile(profile: &FitnessProfile) -> Result<(), InputError> {
        if let Some(target) = profile.weekly_workout_target {
            if target > MAX_WEEKLY_TARGET {
                return Err(InputError::OutOfRange {
                    field: "weekly workout target".to_string(),
                    value: i64::from(target),
                    min: 0,
                    max: i64::from(MAX_WEEKLY_TARGET),
                });
            }
        }

        Ok(())
    }

    /// Validate the set being planned
    pub fn validate_target(set_number: u32, target_reps: Option<u32>) -> Result<(), InputError> {
        if set_number == 0 {
            return Err(InputError::InvalidSetNumber { set_number });
        }
        match target_reps {
            Some(0) => Err(InputError::InvalidTargetReps { reps: 0 }),
            Some(reps) if reps > MAX_REPS => Err(InputError::OutOfRange {
                field: "target reps".to_string(),
                value: i64::from(reps),
                min: 1,
                max: i64::from(MAX_REPS),
            }),
            _ => Ok(()),
        }
    }

    fn validate_scale(field: &str, value: u8) -> Result<(), InputError> {
        if !(CHECKIN_SCALE_MIN..=CHECKIN_SCALE_MAX).contains(&value) {
            return Err(InputError::OutOfRange {
                field: field.to_string(),
                value: i64::from(value),
                min: i64::from(CHECKIN_SCALE_MIN),
                max: i64::from(CHECKIN_SCALE_MAX),
            });
        }
        Ok(())
    }

    fn validate_weight(context: &str, weight: Decimal) -> Result<(), InputError> {
        if weight < Decimal::ZERO {
            return Err(InputError::NegativeWeight {
                context: context.to_string(),
                weight,
            });
        }
        if weight > MAX_WEIGHT {
            return Err(InputError::ExcessiveWeight {
                context: context.to_string(),
                weight,
                max: MAX_WEIGHT,
            });
        }
        Ok(())
    }

    fn validate_reps(context: &str, reps: u32) -> Result<(), InputError> {
        if reps > MAX_REPS {
            return Err(InputError::OutOfRange {
                field: format!("reps in {}", context),
                value: i64::from(reps),
                min: 0,
                max: i64::from(MAX_REPS),
            });
        }
        Ok(())
    }
}
