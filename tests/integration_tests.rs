use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use serde_json::json;

use liftrs::history::{exercise_histories, personal_record};
use liftrs::{
    AnalyticsCache, CacheSettings, Confidence, DailyCheckin, FitnessProfile, MuscleState, OverallRecovery,
    OverloadAdvisor, PlateauDetector, PlateauSeverity, ProgressType, RecoveryScorer, RecoveryStatus,
    SuggestedAction, WorkoutSession,
};

/// Integration tests that run the engine end to end from JSON history

#[cfg(test)]
mod integration_tests {
    use super::*;

    // Friday
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0).unwrap()
    }

    /// Six Thursday bench sessions, all topping out at 100 x 10
    fn bench_history_json() -> serde_json::Value {
        let sessions: Vec<serde_json::Value> = (0..6)
            .map(|week| {
                let completed_at = Utc.with_ymd_and_hms(2024, 6, 13, 18, 0, 0).unwrap() - Duration::weeks(week);
                json!({
                    "id": format!("bench-{}", week),
                    "completedAt": completed_at.to_rfc3339(),
                    "exercises": [{
                        "exerciseId": "barbell_bench_press",
                        "name": "Barbell Bench Press",
                        "primaryMuscles": ["Chest"],
                        "secondaryMuscles": ["triceps", "shoulders"],
                        "sets": [
                            {"weight": 60, "reps": 10, "setNumber": 1, "isCompleted": true, "setType": "warmup"},
                            {"weight": 100, "reps": 10, "setNumber": 1, "isCompleted": true},
                            {"weight": 100, "reps": 10, "setNumber": 2, "isCompleted": true},
                            {"weight": 95, "reps": 10, "setNumber": 3, "isCompleted": true},
                            {"weight": 95, "reps": 6, "setNumber": 4, "isCompleted": false}
                        ]
                    }]
                })
            })
            .collect();
        serde_json::Value::Array(sessions)
    }

    fn bench_sessions() -> Vec<WorkoutSession> {
        serde_json::from_value(bench_history_json()).unwrap()
    }

    /// Test the full recovery workflow from decoded sessions
    #[test]
    fn test_recovery_from_json_history() {
        let sessions = bench_sessions();
        let status = RecoveryScorer::new().score(&sessions, None, None, now()).unwrap();

        // Three fatigued muscles cost 24 points; one session this week is under target
        assert_eq!(status.score, 76);
        assert_eq!(status.overall, OverallRecovery::Moderate);
        assert_eq!(status.suggested_action, SuggestedAction::TrainLight);
        assert_eq!(status.workouts_this_week, 1);
        assert_eq!(status.consecutive_training_days, 1);

        let muscles: Vec<_> = status.muscle_statuses.iter().map(|m| m.muscle.as_str()).collect();
        assert_eq!(muscles, vec!["chest", "shoulders", "triceps"]);
        assert!(status.muscle_statuses.iter().all(|m| m.status == MuscleState::Fatigued));
        assert_eq!(status.muscle_statuses[0].days_since_trained, 0.8);
    }

    /// Test that a bad check-in forces rest whatever the score
    #[test]
    fn test_wellness_override_forces_rest() {
        let sessions = bench_sessions();
        let checkin: DailyCheckin = serde_json::from_value(json!({
            "sleepQuality": 2,
            "sleepHours": 5.0,
            "stressLevel": 4,
            "sorenessLevel": 2,
            "energyLevel": 3
        }))
        .unwrap();

        let status = RecoveryScorer::new()
            .score(&sessions, Some(&checkin), None, now())
            .unwrap();
        assert_eq!(status.overall, OverallRecovery::Overtrained);
        assert_eq!(status.suggested_action, SuggestedAction::Rest);
    }

    /// Test plateau detection over flattened history
    #[test]
    fn test_plateau_from_json_history() {
        let histories = exercise_histories(&bench_sessions());
        assert_eq!(histories.len(), 1);
        // Warm-ups and incomplete sets are dropped
        assert_eq!(histories[0].sets.len(), 18);

        let alerts = PlateauDetector::new().detect_all(&histories, now()).unwrap();
        assert_eq!(alerts.len(), 1);

        let alert = &alerts[0];
        assert_eq!(alert.exercise_id, "barbell_bench_press");
        assert_eq!(alert.weeks_stalled, 6);
        assert_eq!(alert.severity, PlateauSeverity::Significant);
        assert_eq!(alert.last_weight, dec!(100));
        assert_eq!(alert.last_reps, 10);
        assert_eq!(alert.suggestions.len(), 5);
        assert_eq!(alert.percentage_stalled, 0.5);
    }

    /// Test next-set recommendation with a derived personal record
    #[test]
    fn test_recommendation_from_json_history() {
        let histories = exercise_histories(&bench_sessions());
        let sets = &histories[0].sets;
        let pr = personal_record(sets).unwrap();
        assert_eq!(pr.weight, dec!(100));

        let rec = OverloadAdvisor::new()
            .recommend(sets, Some(&pr), 1, None, now())
            .unwrap();
        assert_eq!(rec.progress_type, ProgressType::Weight);
        assert_eq!(rec.suggested_weight, dec!(105));
        assert_eq!(rec.suggested_reps, 10);
        assert_eq!(rec.confidence, Confidence::High);
        assert!(rec.reasoning.contains("personal record"));

        // Set 4 was never completed, so the last session's average is used
        let rec = OverloadAdvisor::new().recommend(sets, Some(&pr), 4, None, now()).unwrap();
        assert_eq!(rec.confidence, Confidence::Medium);
        assert_eq!(rec.progress_type, ProgressType::Maintain);
        assert_eq!(rec.suggested_weight, dec!(98.5));
    }

    /// Test output field names and enum spellings
    #[test]
    fn test_output_json_contract() {
        let sessions = bench_sessions();
        let status = RecoveryScorer::new().score(&sessions, None, None, now()).unwrap();
        let value = serde_json::to_value(&status).unwrap();

        assert_eq!(value["overall"], "moderate");
        assert_eq!(value["suggestedAction"], "train_light");
        assert_eq!(value["score"], 76);
        assert!(value["muscleStatuses"][0]["daysSinceTrained"].is_number());
        assert_eq!(value["muscleStatuses"][0]["status"], "fatigued");

        let rec = OverloadAdvisor::new()
            .recommend(&exercise_histories(&sessions)[0].sets, None, 1, None, now())
            .unwrap();
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["progressType"], "weight");
        assert_eq!(value["confidence"], "high");
        assert!(value.get("suggestedWeight").is_some());
    }

    /// Test that identical inputs give identical output
    #[test]
    fn test_analyzers_are_idempotent() {
        let sessions = bench_sessions();
        let profile = FitnessProfile::default();
        let histories = exercise_histories(&sessions);

        let first = (
            RecoveryScorer::new().score(&sessions, None, Some(&profile), now()).unwrap(),
            PlateauDetector::new().detect_all(&histories, now()).unwrap(),
            OverloadAdvisor::new().recommend(&histories[0].sets, None, 2, Some(8), now()).unwrap(),
        );
        let second = (
            RecoveryScorer::new().score(&sessions, None, Some(&profile), now()).unwrap(),
            PlateauDetector::new().detect_all(&histories, now()).unwrap(),
            OverloadAdvisor::new().recommend(&histories[0].sets, None, 2, Some(8), now()).unwrap(),
        );

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    /// Test that empty input degrades to defaults rather than failing
    #[test]
    fn test_empty_history_defaults() {
        let status = RecoveryScorer::new().score(&[], None, None, now()).unwrap();
        assert_eq!(status, RecoveryStatus::fully_recovered());

        assert!(PlateauDetector::new().detect_all(&[], now()).unwrap().is_empty());

        let rec = OverloadAdvisor::new().recommend(&[], None, 1, None, now()).unwrap();
        assert_eq!(rec.confidence, Confidence::Low);
        assert_eq!(rec.suggested_weight, dec!(0));
    }

    /// Test memoizing recovery results per user outside the engine
    #[test]
    fn test_cached_recovery_per_user() {
        let cache: AnalyticsCache<RecoveryStatus> = AnalyticsCache::new(CacheSettings::default());
        let sessions = bench_sessions();
        let mut computed = 0;

        for minute in [0, 1, 2] {
            let at = now() + Duration::minutes(minute);
            let status = cache
                .get_or_compute("user-1", at, || {
                    computed += 1;
                    RecoveryScorer::new().score(&sessions, None, None, now())
                })
                .unwrap();
            assert_eq!(status.score, 76);
        }

        assert_eq!(computed, 1);
        assert_eq!(cache.metrics().hits, 2);

        cache.invalidate("user-1");
        assert!(cache.get("user-1", now()).is_none());
    }
}
