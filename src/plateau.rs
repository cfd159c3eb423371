//! Plateau detection
//!
//! Flags exercises whose best weekly set volume has stopped moving. Sets are
//! bucketed by ISO week, each week keeps its best single-set volume
//! (weight x reps), and the detector counts how many weeks, walking back from
//! the most recent one, stay within 5% of the most recent week.
//!
//! ## Severity
//! - 3 weeks: Mild
//! - 4-5 weeks: Moderate
//! - 6+ weeks: Significant

use chrono::{DateTime, Datelike, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::history::{in_window, ExerciseHistory, HistoricalSet};
use crate::validation::InputValidator;

/// Weeks within this fraction of the latest week's volume count as stalled
pub const STAGNATION_TOLERANCE: Decimal = dec!(0.95);

/// Shortest stall that produces an alert
pub const MIN_STALLED_WEEKS: u32 = 3;

pub const MODERATE_PLATEAU_WEEKS: u32 = 4;
pub const SIGNIFICANT_PLATEAU_WEEKS: u32 = 6;

/// Reference span for the informational stalled percentage
pub const PLATEAU_REFERENCE_WEEKS: f64 = 12.0;

pub const MAX_SUGGESTIONS: usize = 5;

const BASE_SUGGESTIONS: [&str; 4] = [
    "Add one or two reps per set before increasing the weight",
    "Finish with a lighter drop set to add volume",
    "Slow the lowering phase to three seconds to increase time under tension",
    "Review your nutrition and make sure protein and total calories support progress",
];

const MODERATE_SUGGESTIONS: [&str; 4] = [
    "Take a deload week at around 60% of your working weight",
    "Swap in a variation of this exercise for three to four weeks",
    "Add pause reps to build strength at the sticking point",
    "Aim for 7-9 hours of sleep to support recovery",
];

const SIGNIFICANT_SUGGESTIONS: [&str; 4] = [
    "Switch to a new program or periodization scheme",
    "Change the rep range, for example from 8-12 to 4-6",
    "Pair this exercise with an antagonist superset to add quality volume",
    "Consider working with a coach to review technique and programming",
];

/// Keyword matched against the lowercased exercise name, first match wins
const EXERCISE_TIPS: [(&str, &str); 4] = [
    (
        "bench",
        "Strengthen your triceps with close-grip bench and dips to drive through lockout",
    ),
    (
        "squat",
        "Add pause squats and front squats to build strength out of the hole",
    ),
    (
        "deadlift",
        "Train deficit deadlifts or rack pulls to target your weakest range",
    ),
    (
        "row",
        "Hold a one-second squeeze at the top of each rep and try chest-supported rows",
    ),
];

/// How long and how badly an exercise has stalled
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateauSeverity {
    Mild,
    Moderate,
    Significant,
}

impl PlateauSeverity {
    pub fn from_weeks(weeks_stalled: u32) -> Self {
        if weeks_stalled >= SIGNIFICANT_PLATEAU_WEEKS {
            PlateauSeverity::Significant
        } else if weeks_stalled >= MODERATE_PLATEAU_WEEKS {
            PlateauSeverity::Moderate
        } else {
            PlateauSeverity::Mild
        }
    }
}

impl fmt::Display for PlateauSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlateauSeverity::Mild => write!(f, "Mild"),
            PlateauSeverity::Moderate => write!(f, "Moderate"),
            PlateauSeverity::Significant => write!(f, "Significant"),
        }
    }
}

/// Stagnation alert for a single exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateauAlert {
    pub exercise_id: String,
    pub exercise_name: String,

    /// Consecutive weeks within tolerance of the latest week (at least 3)
    pub weeks_stalled: u32,

    /// Weight of the best set in the window
    pub last_weight: Decimal,

    /// Reps of the best set in the window
    pub last_reps: u32,

    /// Most specific first, at most five
    pub suggestions: Vec<String>,

    pub severity: PlateauSeverity,

    /// weeks_stalled / 12, informational only
    pub percentage_stalled: f64,
}

/// Best single-set volume for one ISO week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyVolume {
    pub iso_year: i32,
    pub iso_week: u32,
    pub best_volume: Decimal,
}

/// Detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateauConfig {
    /// Days of history considered (default: 90)
    pub lookback_days: u32,

    /// Fewer sets than this never alert (default: 6)
    pub min_data_points: usize,

    /// Fewer weekly buckets than this never alert (default: 3)
    pub min_weekly_buckets: usize,
}

impl Default for PlateauConfig {
    fn default() -> Self {
        PlateauConfig {
            lookback_days: 90,
            min_data_points: 6,
            min_weekly_buckets: 3,
        }
    }
}

/// Best volume per ISO week, most recent week first
pub fn weekly_best_volumes<'a, I>(sets: I) -> Vec<WeeklyVolume>
where
    I: IntoIterator<Item = &'a HistoricalSet>,
{
    let mut weeks: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();

    for set in sets {
        let iso = set.completed_at.date_naive().iso_week();
        let volume = set.volume();
        weeks
            .entry((iso.year(), iso.week()))
            .and_modify(|best| *best = (*best).max(volume))
            .or_insert(volume);
    }

    weeks
        .into_iter()
        .rev()
        .map(|((iso_year, iso_week), best_volume)| WeeklyVolume {
            iso_year,
            iso_week,
            best_volume,
        })
        .collect()
}

/// Consecutive weeks, from the most recent, within tolerance of it
///
/// The most recent week always counts. A zero baseline yields 0 since
/// untracked load says nothing about stagnation.
pub fn stalled_weeks(weeks: &[WeeklyVolume]) -> u32 {
    let Some(latest) = weeks.first() else {
        return 0;
    };
    if latest.best_volume <= Decimal::ZERO {
        return 0;
    }

    let threshold = latest.best_volume * STAGNATION_TOLERANCE;
    let within = weeks[1..]
        .iter()
        .take_while(|week| week.best_volume >= threshold)
        .count();

    1 + within as u32
}

/// Remediation ideas, most specific first
pub fn suggestions_for(exercise_name: &str, severity: PlateauSeverity) -> Vec<String> {
    let mut suggestions: Vec<&str> = Vec::new();

    if severity == PlateauSeverity::Significant {
        suggestions.extend(SIGNIFICANT_SUGGESTIONS);
    }
    if severity >= PlateauSeverity::Moderate {
        suggestions.extend(MODERATE_SUGGESTIONS);
    }
    suggestions.extend(BASE_SUGGESTIONS);

    let name = exercise_name.to_lowercase();
    if let Some((_, tip)) = EXERCISE_TIPS.iter().find(|(keyword, _)| name.contains(keyword)) {
        suggestions.push(tip);
    }

    suggestions
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

/// Detects stalled progress per exercise
pub struct PlateauDetector {
    config: PlateauConfig,
}

impl Default for PlateauDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PlateauDetector {
    /// Create detector with default configuration
    pub fn new() -> Self {
        PlateauDetector {
            config: PlateauConfig::default(),
        }
    }

    /// Create detector with custom configuration
    pub fn with_config(config: PlateauConfig) -> Self {
        PlateauDetector { config }
    }

    pub fn config(&self) -> &PlateauConfig {
        &self.config
    }

    /// Check one exercise for a plateau
    ///
    /// Sets outside the lookback window are ignored. Returns `None` when the
    /// history is too thin to judge or progress is still being made.
    pub fn detect(&self, history: &ExerciseHistory, now: DateTime<Utc>) -> Result<Option<PlateauAlert>> {
        InputValidator::validate_history(history)?;
        Ok(self.evaluate(history, now))
    }

    /// Check every exercise and return alerts, worst first
    ///
    /// Ordered by severity, then weeks stalled, then exercise name.
    pub fn detect_all(&self, histories: &[ExerciseHistory], now: DateTime<Utc>) -> Result<Vec<PlateauAlert>> {
        for history in histories {
            InputValidator::validate_history(history)?;
        }

        let mut alerts: Vec<PlateauAlert> = histories
            .par_iter()
            .filter_map(|history| self.evaluate(history, now))
            .collect();

        alerts.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then(b.weeks_stalled.cmp(&a.weeks_stalled))
                .then_with(|| a.exercise_name.cmp(&b.exercise_name))
                .then_with(|| a.exercise_id.cmp(&b.exercise_id))
        });

        Ok(alerts)
    }

    fn evaluate(&self, history: &ExerciseHistory, now: DateTime<Utc>) -> Option<PlateauAlert> {
        let sets: Vec<&HistoricalSet> = history
            .sets
            .iter()
            .filter(|set| in_window(set.completed_at, now, self.config.lookback_days))
            .collect();

        if sets.len() < self.config.min_data_points {
            tracing::debug!(
                exercise = %history.exercise_id,
                data_points = sets.len(),
                "Not enough sets for plateau detection"
            );
            return None;
        }

        let weeks = weekly_best_volumes(sets.iter().copied());
        if weeks.len() < self.config.min_weekly_buckets {
            tracing::debug!(exercise = %history.exercise_id, weeks = weeks.len(), "Not enough weeks");
            return None;
        }

        let weeks_stalled = stalled_weeks(&weeks);
        tracing::debug!(
            exercise = %history.exercise_id,
            baseline = %weeks[0].best_volume,
            weeks_stalled,
            "Evaluated weekly volumes"
        );
        if weeks_stalled < MIN_STALLED_WEEKS {
            return None;
        }

        // Heaviest-volume set; the most recent one on ties
        let best = sets.iter().max_by(|a, b| {
            a.volume()
                .cmp(&b.volume())
                .then(a.completed_at.cmp(&b.completed_at))
        })?;

        let severity = PlateauSeverity::from_weeks(weeks_stalled);
        tracing::info!(
            exercise = %history.exercise_name,
            weeks_stalled,
            %severity,
            "Plateau detected"
        );

        Some(PlateauAlert {
            exercise_id: history.exercise_id.clone(),
            exercise_name: history.exercise_name.clone(),
            weeks_stalled,
            last_weight: best.weight,
            last_reps: best.reps,
            suggestions: suggestions_for(&history.exercise_name, severity),
            severity,
            percentage_stalled: f64::from(weeks_stalled) / PLATEAU_REFERENCE_WEEKS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InputError, LiftRsError};
    use chrono::{Duration, TimeZone};

    fn week(best_volume: Decimal) -> WeeklyVolume {
        WeeklyVolume {
            iso_year: 2024,
            iso_week: 1,
            best_volume,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0).unwrap()
    }

    /// Two sets per week for each weekly volume, most recent week first
    fn history(name: &str, weekly: &[(Decimal, u32)]) -> ExerciseHistory {
        let mut sets = Vec::new();
        for (i, (weight, reps)) in weekly.iter().enumerate() {
            let day = now() - Duration::weeks(i as i64) - Duration::days(1);
            sets.push(HistoricalSet {
                session_id: format!("s{}", i),
                completed_at: day,
                set_number: 1,
                weight: *weight,
                reps: *reps,
            });
            sets.push(HistoricalSet {
                session_id: format!("s{}", i),
                completed_at: day,
                set_number: 2,
                weight: *weight - dec!(10),
                reps: *reps,
            });
        }
        ExerciseHistory {
            exercise_id: name.to_lowercase().replace(' ', "_"),
            exercise_name: name.to_string(),
            sets,
        }
    }

    #[test]
    fn test_streak_stops_below_tolerance() {
        let weeks = vec![week(dec!(1000)), week(dec!(980)), week(dec!(1010)), week(dec!(600))];
        assert_eq!(stalled_weeks(&weeks), 3);
        assert_eq!(PlateauSeverity::from_weeks(3), PlateauSeverity::Mild);

        // 949 is just under 95% of 1000
        let weeks = vec![week(dec!(1000)), week(dec!(949)), week(dec!(1000))];
        assert_eq!(stalled_weeks(&weeks), 1);

        let weeks = vec![week(dec!(1000)), week(dec!(950))];
        assert_eq!(stalled_weeks(&weeks), 2);
    }

    #[test]
    fn test_zero_baseline_never_stalls() {
        let weeks = vec![week(dec!(0)), week(dec!(0)), week(dec!(0))];
        assert_eq!(stalled_weeks(&weeks), 0);
        assert_eq!(stalled_weeks(&[]), 0);
    }

    #[test]
    fn test_mild_plateau_detected() {
        // Week volumes 1000, 980, 1010, 600
        let history = history(
            "Barbell Bench Press",
            &[(dec!(100), 10), (dec!(98), 10), (dec!(101), 10), (dec!(60), 10)],
        );
        let alert = PlateauDetector::new().detect(&history, now()).unwrap().unwrap();

        assert_eq!(alert.weeks_stalled, 3);
        assert_eq!(alert.severity, PlateauSeverity::Mild);
        assert_eq!(alert.last_weight, dec!(101));
        assert_eq!(alert.last_reps, 10);
        assert_eq!(alert.percentage_stalled, 0.25);
        assert_eq!(alert.suggestions.len(), 5);
        assert!(alert.suggestions[4].contains("close-grip bench"));
    }

    #[test]
    fn test_implausible_weight_fails_fast() {
        let sets = (0..7)
            .map(|i| HistoricalSet {
                session_id: format!("s{}", i),
                completed_at: now() - Duration::weeks(i) - Duration::days(1),
                set_number: 1,
                weight: Decimal::MAX,
                reps: 5,
            })
            .collect();
        let history = ExerciseHistory {
            exercise_id: "deadlift".to_string(),
            exercise_name: "Deadlift".to_string(),
            sets,
        };

        let err = PlateauDetector::new().detect(&history, now()).unwrap_err();
        assert!(matches!(
            err,
            LiftRsError::InvalidInput(InputError::ExcessiveWeight { .. })
        ));
    }

    #[test]
    fn test_too_few_sets_never_alerts() {
        let mut history = history("Squat", &[(dec!(100), 5), (dec!(100), 5), (dec!(100), 5)]);
        history.sets.truncate(5);
        assert!(PlateauDetector::new().detect(&history, now()).unwrap().is_none());
    }

    #[test]
    fn test_progressing_exercise_has_no_alert() {
        let history = history(
            "Squat",
            &[(dec!(120), 5), (dec!(110), 5), (dec!(100), 5), (dec!(90), 5)],
        );
        assert!(PlateauDetector::new().detect(&history, now()).unwrap().is_none());
    }

    #[test]
    fn test_sets_outside_window_ignored() {
        let mut history = history("Squat", &[(dec!(100), 5); 3]);
        for set in &mut history.sets {
            set.completed_at -= Duration::days(120);
        }
        assert!(PlateauDetector::new().detect(&history, now()).unwrap().is_none());
    }

    #[test]
    fn test_significant_suggestions_ordering() {
        let suggestions = suggestions_for("Deadlift", PlateauSeverity::Significant);
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(suggestions[0], SIGNIFICANT_SUGGESTIONS[0]);
        assert_eq!(suggestions[4], MODERATE_SUGGESTIONS[0]);

        let suggestions = suggestions_for("Pendlay Row", PlateauSeverity::Moderate);
        assert_eq!(suggestions[0], MODERATE_SUGGESTIONS[0]);
        assert_eq!(suggestions[4], BASE_SUGGESTIONS[0]);

        let suggestions = suggestions_for("Cable Fly", PlateauSeverity::Mild);
        assert_eq!(suggestions.len(), 4);
    }

    #[test]
    fn test_detect_all_sorted_by_severity_then_weeks() {
        let flat = |n: usize| vec![(dec!(100), 5); n];
        let histories = vec![
            history("Leg Press", &flat(3)),
            history("Squat", &flat(7)),
            history("Overhead Press", &flat(4)),
            history("Curl", &flat(5)),
            history("Lunge", &[(dec!(50), 10), (dec!(40), 10), (dec!(30), 10)]),
        ];

        let alerts = PlateauDetector::new().detect_all(&histories, now()).unwrap();
        let order: Vec<_> = alerts
            .iter()
            .map(|a| (a.exercise_name.as_str(), a.weeks_stalled, a.severity))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Squat", 7, PlateauSeverity::Significant),
                ("Curl", 5, PlateauSeverity::Moderate),
                ("Overhead Press", 4, PlateauSeverity::Moderate),
                ("Leg Press", 3, PlateauSeverity::Mild),
            ]
        );
    }

    #[test]
    fn test_iso_weeks_across_year_boundary() {
        let mk = |y: i32, m: u32, d: u32, weight: Decimal| HistoricalSet {
            session_id: format!("{}-{}-{}", y, m, d),
            completed_at: Utc.with_ymd_and_hms(y, m, d, 18, 0, 0).unwrap(),
            set_number: 1,
            weight,
            reps: 1,
        };
        // 2024-12-30 and 2025-01-02 both fall in ISO week 2025-W01
        let sets = vec![
            mk(2024, 12, 23, dec!(100)),
            mk(2024, 12, 30, dec!(110)),
            mk(2025, 1, 2, dec!(105)),
        ];

        let weeks = weekly_best_volumes(&sets);
        assert_eq!(weeks.len(), 2);
        assert_eq!((weeks[0].iso_year, weeks[0].iso_week), (2025, 1));
        assert_eq!(weeks[0].best_volume, dec!(110));
        assert_eq!((weeks[1].iso_year, weeks[1].iso_week), (2024, 52));

        // 2020 has 53 ISO weeks; New Year's Day 2021 still belongs to 2020-W53
        let sets = vec![mk(2020, 12, 28, dec!(90)), mk(2021, 1, 1, dec!(95)), mk(2021, 1, 4, dec!(80))];
        let weeks = weekly_best_volumes(&sets);
        assert_eq!(
            weeks.iter().map(|w| (w.iso_year, w.iso_week)).collect::<Vec<_>>(),
            vec![(2021, 1), (2020, 53)]
        );
        assert_eq!(weeks[1].best_volume, dec!(95));
    }
}
