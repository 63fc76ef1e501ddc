//! Progress queries over the append-only log sequence.
//!
//! Logs are written once by the session engine and never edited, so every
//! query here is a pure read. The only consumer today is the per-exercise
//! progress chart.

use crate::types::WorkoutLog;
use chrono::{DateTime, Utc};

/// One chart point: the heaviest weight recorded for an exercise in one log
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressPoint {
    pub date: DateTime<Utc>,
    pub max_weight: f64,
}

/// Max-weight-per-session series for one exercise, ascending by date
///
/// Considers every recorded set, completed or not; the log already
/// represents what was recorded, so a logged-but-unfinished attempt still
/// counts toward the max. Lazy, restartable and finite; consumers
/// typically keep only the most recent points (see [`recent_progress`]).
pub fn progress_series<'a>(
    logs: &'a [WorkoutLog],
    exercise_id: &str,
) -> impl Iterator<Item = ProgressPoint> + 'a {
    let mut relevant: Vec<&WorkoutLog> = logs
        .iter()
        .filter(|log| log.exercises.iter().any(|e| e.exercise_id == exercise_id))
        .collect();
    relevant.sort_by_key(|log| log.date);

    let exercise_id = exercise_id.to_string();
    relevant.into_iter().map(move |log| {
        let max_weight = log
            .exercises
            .iter()
            .filter(|e| e.exercise_id == exercise_id)
            .flat_map(|e| e.sets.iter())
            .map(|s| s.weight)
            .fold(0.0_f64, f64::max);
        ProgressPoint {
            date: log.date,
            max_weight,
        }
    })
}

/// The last `points` entries of the progress series, oldest first
pub fn recent_progress(
    logs: &[WorkoutLog],
    exercise_id: &str,
    points: usize,
) -> Vec<ProgressPoint> {
    let mut series: Vec<ProgressPoint> = progress_series(logs, exercise_id).collect();
    if series.len() > points {
        series.drain(..series.len() - points);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{new_id, LoggedExercise, PerformedSet, WorkoutLog};
    use chrono::{Duration, Utc};

    fn log_with(exercise_id: &str, days_ago: i64, weights: &[f64]) -> WorkoutLog {
        WorkoutLog {
            id: new_id(),
            date: Utc::now() - Duration::days(days_ago),
            routine_id: "r1".into(),
            split_name: "A".into(),
            exercises: vec![LoggedExercise {
                exercise_id: exercise_id.into(),
                exercise_name: "Agachamento Livre".into(),
                sets: weights
                    .iter()
                    .enumerate()
                    .map(|(i, &w)| PerformedSet {
                        reps: "10".into(),
                        weight: w,
                        // Alternate flags: completion must not matter
                        completed: i % 2 == 0,
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn test_series_is_ascending_by_date() {
        let logs = vec![
            log_with("def_07", 1, &[50.0]),
            log_with("def_07", 10, &[40.0]),
            log_with("def_07", 5, &[45.0]),
        ];

        let series: Vec<_> = progress_series(&logs, "def_07").collect();
        assert_eq!(series.len(), 3);
        assert!(series.windows(2).all(|w| w[0].date <= w[1].date));
        let weights: Vec<f64> = series.iter().map(|p| p.max_weight).collect();
        assert_eq!(weights, vec![40.0, 45.0, 50.0]);
    }

    #[test]
    fn test_series_invariant_under_input_reordering() {
        let a = log_with("def_07", 3, &[30.0, 35.0]);
        let b = log_with("def_07", 2, &[32.5]);
        let c = log_with("def_07", 1, &[37.5]);

        let forward: Vec<_> =
            progress_series(&[a.clone(), b.clone(), c.clone()], "def_07").collect();
        let shuffled: Vec<_> = progress_series(&[c, a, b], "def_07").collect();
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_max_ignores_completed_flag() {
        // Heaviest set is the incomplete one (odd index)
        let logs = vec![log_with("def_07", 1, &[40.0, 60.0, 50.0])];
        let series: Vec<_> = progress_series(&logs, "def_07").collect();
        assert_eq!(series[0].max_weight, 60.0);
    }

    #[test]
    fn test_other_exercises_are_filtered_out() {
        let logs = vec![
            log_with("def_07", 2, &[40.0]),
            log_with("def_01", 1, &[80.0]),
        ];
        let series: Vec<_> = progress_series(&logs, "def_07").collect();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].max_weight, 40.0);
    }

    #[test]
    fn test_series_is_restartable() {
        let logs = vec![log_with("def_07", 1, &[40.0])];
        assert_eq!(progress_series(&logs, "def_07").count(), 1);
        assert_eq!(progress_series(&logs, "def_07").count(), 1);
    }

    #[test]
    fn test_recent_progress_truncates_to_newest() {
        let logs: Vec<_> = (0..15)
            .map(|i| log_with("def_07", 15 - i, &[30.0 + i as f64]))
            .collect();

        let recent = recent_progress(&logs, "def_07", 10);
        assert_eq!(recent.len(), 10);
        // Keeps the newest points, still oldest first
        assert_eq!(recent[0].max_weight, 35.0);
        assert_eq!(recent[9].max_weight, 44.0);
    }

    #[test]
    fn test_empty_history_yields_empty_series() {
        let series: Vec<_> = progress_series(&[], "def_07").collect();
        assert!(series.is_empty());
    }
}
