//! Workout history shaping
//!
//! Helpers that turn the raw session list handed over by the storage layer
//! into the windows and per-exercise views each analyzer works on.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{PersonalRecord, WorkoutSession};

/// A completed working set flattened out of its session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSet {
    pub session_id: String,
    pub completed_at: DateTime<Utc>,
    pub set_number: u32,
    pub weight: Decimal,
    pub reps: u32,
}

impl HistoricalSet {
    /// Weight times reps, saturating at `Decimal::MAX`
    pub fn volume(&self) -> Decimal {
        self.weight
            .checked_mul(Decimal::from(self.reps))
            .unwrap_or(Decimal::MAX)
    }
}

/// All working sets logged for one exercise, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseHistory {
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: Vec<HistoricalSet>,
}

/// Sets performed in a single session, used for session-to-session comparison
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSets {
    pub session_id: String,
    pub completed_at: DateTime<Utc>,
    pub sets: Vec<HistoricalSet>,
}

impl SessionSets {
    /// Calendar day (UTC) the session belongs to
    pub fn date(&self) -> NaiveDate {
        self.completed_at.date_naive()
    }

    /// First set logged under the given set number
    pub fn set_number(&self, set_number: u32) -> Option<&HistoricalSet> {
        self.sets.iter().find(|set| set.set_number == set_number)
    }
}

/// Start of the lookback window ending at `now`
pub fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(days))
}

/// Whether a timestamp falls inside `(now - days, now]`
pub fn in_window(at: DateTime<Utc>, now: DateTime<Utc>, days: u32) -> bool {
    at > window_start(now, days) && at <= now
}

/// Sessions completed within the last `days` days
pub fn sessions_within(
    sessions: &[WorkoutSession],
    now: DateTime<Utc>,
    days: u32,
) -> Vec<&WorkoutSession> {
    sessions
        .iter()
        .filter(|session| in_window(session.completed_at, now, days))
        .collect()
}

/// Flatten sessions into per-exercise histories, sorted by exercise id
///
/// Only completed working sets are kept; exercises without any are dropped.
/// The most recently logged name wins when an exercise was renamed.
pub fn exercise_histories(sessions: &[WorkoutSession]) -> Vec<ExerciseHistory> {
    let mut by_exercise: BTreeMap<&str, (DateTime<Utc>, &str, Vec<HistoricalSet>)> =
        BTreeMap::new();

    for session in sessions {
        for entry in &session.exercises {
            let sets: Vec<HistoricalSet> = entry
                .sets
                .iter()
                .filter(|set| set.counts_toward_progress())
                .map(|set| HistoricalSet {
                    session_id: session.id.clone(),
                    completed_at: set.completed_at.unwrap_or(session.completed_at),
                    set_number: set.set_number,
                    weight: set.weight,
                    reps: set.reps,
                })
                .collect();

            if sets.is_empty() {
                continue;
            }

            let slot = by_exercise
                .entry(entry.exercise_id.as_str())
                .or_insert_with(|| (session.completed_at, entry.name.as_str(), Vec::new()));
            if session.completed_at >= slot.0 {
                slot.0 = session.completed_at;
                slot.1 = entry.name.as_str();
            }
            slot.2.extend(sets);
        }
    }

    by_exercise
        .into_iter()
        .map(|(exercise_id, (_, name, mut sets))| {
            sets.sort_by(|a, b| {
                a.completed_at
                    .cmp(&b.completed_at)
                    .then(a.set_number.cmp(&b.set_number))
            });
            ExerciseHistory {
                exercise_id: exercise_id.to_string(),
                exercise_name: name.to_string(),
                sets,
            }
        })
        .collect()
}

/// History for a single exercise, if it was ever trained
pub fn exercise_history(sessions: &[WorkoutSession], exercise_id: &str) -> Option<ExerciseHistory> {
    exercise_histories(sessions)
        .into_iter()
        .find(|history| history.exercise_id == exercise_id)
}

/// Best set by volume; ties go to the heavier set
pub fn personal_record(sets: &[HistoricalSet]) -> Option<PersonalRecord> {
    sets.iter()
        .max_by(|a, b| a.volume().cmp(&b.volume()).then(a.weight.cmp(&b.weight)))
        .map(|set| PersonalRecord {
            weight: set.weight,
            reps: set.reps,
        })
}

/// Group sets by session id, newest session first
///
/// A session is stamped with its latest set. Sets keep their logged order.
pub fn group_by_session(sets: &[HistoricalSet]) -> Vec<SessionSets> {
    let mut by_session: BTreeMap<&str, SessionSets> = BTreeMap::new();

    for set in sets {
        let session = by_session
            .entry(set.session_id.as_str())
            .or_insert_with(|| SessionSets {
                session_id: set.session_id.clone(),
                completed_at: set.completed_at,
                sets: Vec::new(),
            });
        session.completed_at = session.completed_at.max(set.completed_at);
        session.sets.push(set.clone());
    }

    let mut sessions: Vec<SessionSets> = by_session.into_values().collect();
    sessions.sort_by(|a, b| {
        b.completed_at
            .cmp(&a.completed_at)
            .then_with(|| b.session_id.cmp(&a.session_id))
    });
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseEntry, SetRecord, SetType};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn set(weight: Decimal, reps: u32, set_number: u32, completed: bool, set_type: SetType) -> SetRecord {
        SetRecord {
            weight,
            reps,
            set_number,
            is_completed: completed,
            set_type,
            completed_at: None,
        }
    }

    fn session(id: &str, completed_at: DateTime<Utc>, name: &str, sets: Vec<SetRecord>) -> WorkoutSession {
        WorkoutSession {
            id: id.to_string(),
            completed_at,
            exercises: vec![ExerciseEntry {
                exercise_id: "squat".to_string(),
                name: name.to_string(),
                primary_muscles: vec!["quadriceps".to_string()],
                secondary_muscles: vec![],
                sets,
            }],
        }
    }

    #[test]
    fn test_sessions_within_window() {
        let now = at(20, 12);
        let sessions = vec![
            session("old", at(5, 12), "Squat", vec![]),
            session("edge", at(6, 12), "Squat", vec![]),
            session("recent", at(19, 12), "Squat", vec![]),
            session("future", at(21, 12), "Squat", vec![]),
        ];

        let ids: Vec<_> = sessions_within(&sessions, now, 14)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        // Exactly 14 days ago is outside the half-open window
        assert_eq!(ids, vec!["recent"]);
    }

    #[test]
    fn test_exercise_histories_skip_warmups_and_incomplete_sets() {
        let sessions = vec![
            session(
                "a",
                at(1, 10),
                "Back Squat",
                vec![
                    set(dec!(135), 10, 1, true, SetType::Warmup),
                    set(dec!(225), 5, 2, true, SetType::Normal),
                    set(dec!(225), 3, 3, false, SetType::Normal),
                ],
            ),
            session("b", at(3, 10), "Squat", vec![set(dec!(230), 5, 1, true, SetType::Failure)]),
        ];

        let histories = exercise_histories(&sessions);
        assert_eq!(histories.len(), 1);
        let history = &histories[0];
        assert_eq!(history.exercise_name, "Squat");
        assert_eq!(history.sets.len(), 2);
        assert_eq!(history.sets[0].weight, dec!(225));
        assert_eq!(history.sets[1].session_id, "b");

        assert_eq!(exercise_history(&sessions, "squat").as_ref(), Some(history));
        assert!(exercise_history(&sessions, "bench").is_none());
    }

    #[test]
    fn test_personal_record_prefers_volume_then_weight() {
        let mk = |weight: Decimal, reps: u32| HistoricalSet {
            session_id: "s".to_string(),
            completed_at: at(1, 10),
            set_number: 1,
            weight,
            reps,
        };
        let sets = vec![mk(dec!(100), 10), mk(dec!(200), 5), mk(dec!(150), 6)];
        let pr = personal_record(&sets).unwrap();
        assert_eq!(pr.weight, dec!(200));
        assert_eq!(pr.reps, 5);

        assert!(personal_record(&[]).is_none());
    }

    #[test]
    fn test_volume_saturates_instead_of_overflowing() {
        let set = HistoricalSet {
            session_id: "s".to_string(),
            completed_at: at(1, 10),
            set_number: 1,
            weight: Decimal::MAX,
            reps: 5,
        };
        assert_eq!(set.volume(), Decimal::MAX);
        assert_eq!(personal_record(&[set]).unwrap().reps, 5);
    }

    #[test]
    fn test_group_by_session_newest_first() {
        let mk = |session: &str, day: u32, set_number: u32| HistoricalSet {
            session_id: session.to_string(),
            completed_at: at(day, 10),
            set_number,
            weight: dec!(100),
            reps: 5,
        };
        let sets = vec![mk("a", 1, 1), mk("a", 1, 2), mk("b", 4, 1), mk("c", 2, 1)];

        let sessions = group_by_session(&sets);
        let ids: Vec<_> = sessions.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(sessions[2].sets.len(), 2);
        assert!(sessions[2].set_number(2).is_some());
        assert!(sessions[0].set_number(2).is_none());
    }
}
