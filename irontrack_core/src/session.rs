//! Workout session state machine.
//!
//! A [`WorkoutSession`] is the live, in-memory, uncommitted state of one
//! workout built from the active routine's next split. The state machine is
//! expressed through ownership: a constructed session is in progress, and
//! the terminal transitions (`finish`, `cancel`) consume the value, so no
//! code path can mutate a finished or cancelled session.
//!
//! Nothing here touches the document. `finish` emits a [`SessionOutcome`]
//! holding the updated routine and the new immutable log as one atomic
//! result; the caller commits it with [`Document::apply_session`] and
//! persists the snapshot. `cancel` discards everything.

use crate::catalog::exercise_name;
use crate::config::SessionConfig;
use crate::types::{
    new_id, Document, ExerciseDef, LastPerformance, LoggedExercise, PerformedSet, Routine,
    RoutineSplit, WorkoutLog,
};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Single-shot rest countdown, alive only inside a session
///
/// Not persisted. Driven by an external once-per-second tick that mutates
/// only timer state, never set data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestTimer {
    pub remaining: u32,
    pub total: u32,
}

impl RestTimer {
    fn new(total: u32) -> Self {
        Self {
            remaining: total,
            total,
        }
    }
}

/// The atomic result of finishing a session
///
/// Routine (with refreshed carry-forward caches and advanced rotation) and
/// log must be committed to the document in a single write.
#[derive(Clone, Debug)]
pub struct SessionOutcome {
    pub routine: Routine,
    pub log: WorkoutLog,
}

/// A workout in progress, built from one split
#[derive(Debug)]
pub struct WorkoutSession {
    routine: Routine,
    /// Editable set lists keyed by routine-exercise id; iteration order at
    /// finish time comes from the split, not this map
    sets: HashMap<String, Vec<PerformedSet>>,
    rest_timer: Option<RestTimer>,
    /// Countdown fallback for exercises with no configured rest
    default_rest: u32,
}

impl WorkoutSession {
    /// Start a session with the stock session defaults
    pub fn start(document: &Document) -> Result<Self> {
        Self::start_with_config(document, &SessionConfig::default())
    }

    /// Start a session from the document's active routine
    ///
    /// Seeds one set list per routine exercise of the current split: from
    /// the slot's last performance with every `completed` flag reset when
    /// one exists, otherwise `target_sets` synthetic sets at the target
    /// reps and zero weight. A session therefore always starts from "what
    /// you did or intended last time", never from zero, once any history
    /// exists for the slot.
    ///
    /// `config.default_rest_seconds` becomes this session's countdown
    /// fallback for exercises whose own rest is zero or unset.
    pub fn start_with_config(document: &Document, config: &SessionConfig) -> Result<Self> {
        let routine = document
            .active_routine()
            .ok_or_else(|| Error::Session("no active routine".into()))?;
        let split = routine
            .current_split()
            .ok_or_else(|| Error::Session("active routine has no splits".into()))?;

        let mut sets = HashMap::new();
        for entry in &split.exercises {
            let seeded = match &entry.last_performance {
                Some(last) if !last.sets.is_empty() => last
                    .sets
                    .iter()
                    .map(|s| PerformedSet {
                        reps: s.reps.clone(),
                        weight: s.weight,
                        completed: false,
                    })
                    .collect(),
                _ => (0..entry.target_sets)
                    .map(|_| PerformedSet {
                        reps: entry.target_reps.clone(),
                        weight: 0.0,
                        completed: false,
                    })
                    .collect::<Vec<_>>(),
            };
            sets.insert(entry.id.clone(), seeded);
        }

        tracing::info!(
            "started session for split '{}' ({} exercises)",
            split.name,
            split.exercises.len()
        );

        Ok(Self {
            routine: routine.clone(),
            sets,
            rest_timer: None,
            default_rest: config.default_rest_seconds,
        })
    }

    /// The split this session was built from
    pub fn split(&self) -> &RoutineSplit {
        // current_split_index was validated in start and nothing here
        // mutates the routine's splits
        &self.routine.splits[self.routine.current_split_index]
    }

    /// Current set list for a routine-exercise id (empty for unknown ids)
    pub fn sets(&self, routine_exercise_id: &str) -> &[PerformedSet] {
        self.sets
            .get(routine_exercise_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the reps token of one set; unknown id or index is a no-op
    pub fn set_reps(&mut self, routine_exercise_id: &str, index: usize, reps: impl Into<String>) {
        if let Some(set) = self.set_mut(routine_exercise_id, index) {
            set.reps = reps.into();
        }
    }

    /// Replace the weight of one set; unknown id or index is a no-op
    pub fn set_weight(&mut self, routine_exercise_id: &str, index: usize, weight: f64) {
        if let Some(set) = self.set_mut(routine_exercise_id, index) {
            set.weight = weight;
        }
    }

    /// Flip one set's completed flag
    ///
    /// Completing a set (false to true) starts the rest countdown seeded
    /// from that exercise's configured rest, replacing any countdown still
    /// running. Un-completing has no timer side effect.
    pub fn toggle_complete(&mut self, routine_exercise_id: &str, index: usize) {
        let rest = self.rest_seconds_for(routine_exercise_id);
        let Some(set) = self.set_mut(routine_exercise_id, index) else {
            return;
        };
        set.completed = !set.completed;
        if set.completed {
            self.rest_timer = Some(RestTimer::new(rest));
        }
    }

    /// Append a set cloned from the last one (reps "10", weight 0 when the
    /// list is empty); unknown ids are no-ops
    pub fn add_set(&mut self, routine_exercise_id: &str) {
        let Some(list) = self.sets.get_mut(routine_exercise_id) else {
            return;
        };
        let (reps, weight) = match list.last() {
            Some(last) => (last.reps.clone(), last.weight),
            None => ("10".to_string(), 0.0),
        };
        list.push(PerformedSet {
            reps,
            weight,
            completed: false,
        });
    }

    /// Delete one set by index; unknown id or index is a no-op
    ///
    /// Emptying a list is allowed: the exercise is then excluded from the
    /// eventual log, a deliberate "I didn't do this today" signal.
    pub fn remove_set(&mut self, routine_exercise_id: &str, index: usize) {
        if let Some(list) = self.sets.get_mut(routine_exercise_id) {
            if index < list.len() {
                list.remove(index);
            }
        }
    }

    /// The rest countdown, if one is running
    pub fn rest_timer(&self) -> Option<&RestTimer> {
        self.rest_timer.as_ref()
    }

    /// Advance the rest countdown by one second, deactivating at zero
    pub fn tick_rest(&mut self) {
        if let Some(timer) = &mut self.rest_timer {
            timer.remaining = timer.remaining.saturating_sub(1);
            if timer.remaining == 0 {
                self.rest_timer = None;
            }
        }
    }

    /// Deactivate the rest countdown immediately; set data is unaffected
    pub fn skip_rest(&mut self) {
        self.rest_timer = None;
    }

    /// One-line summary of this session for the coach-chat collaborator
    pub fn coach_context(&self, library: &[ExerciseDef]) -> String {
        let split = self.split();
        let names: Vec<&str> = split
            .exercises
            .iter()
            .map(|e| exercise_name(library, &e.exercise_id))
            .collect();
        format!("Treino: {}. Exercícios: {}.", split.name, names.join(", "))
    }

    /// Finish the workout, consuming the session
    ///
    /// Builds the immutable log from every exercise with a non-empty set
    /// list (names snapshotted from the library at this instant), refreshes
    /// `last_performance` for exactly those exercises, and advances the
    /// rotation by one regardless of how many sets were completed.
    pub fn finish(mut self, library: &[ExerciseDef], now: DateTime<Utc>) -> SessionOutcome {
        let split_index = self.routine.current_split_index;
        let split = &mut self.routine.splits[split_index];

        let mut logged = Vec::new();
        for entry in &mut split.exercises {
            let recorded = match self.sets.get(&entry.id) {
                Some(sets) if !sets.is_empty() => sets.clone(),
                _ => continue,
            };
            logged.push(LoggedExercise {
                exercise_id: entry.exercise_id.clone(),
                exercise_name: exercise_name(library, &entry.exercise_id).to_string(),
                sets: recorded.clone(),
            });
            entry.last_performance = Some(LastPerformance {
                date: now,
                sets: recorded,
            });
        }

        let log = WorkoutLog {
            id: new_id(),
            date: now,
            routine_id: self.routine.id.clone(),
            split_name: split.name.clone(),
            exercises: logged,
        };

        self.routine.current_split_index = (split_index + 1) % self.routine.splits.len();

        tracing::info!(
            "finished session '{}': {} exercises logged, next split index {}",
            log.split_name,
            log.exercises.len(),
            self.routine.current_split_index
        );

        SessionOutcome {
            routine: self.routine,
            log,
        }
    }

    /// Abandon the workout, consuming the session
    ///
    /// No log, no carry-forward update, no rotation advance.
    pub fn cancel(self) {
        tracing::info!("session cancelled, discarding state");
    }

    fn set_mut(&mut self, routine_exercise_id: &str, index: usize) -> Option<&mut PerformedSet> {
        self.sets.get_mut(routine_exercise_id)?.get_mut(index)
    }

    /// Configured rest for a routine exercise, falling back to the
    /// session default when zero or unset
    fn rest_seconds_for(&self, routine_exercise_id: &str) -> u32 {
        self.split()
            .exercises
            .iter()
            .find(|e| e.id == routine_exercise_id)
            .map(|e| e.rest_time_seconds)
            .filter(|&r| r > 0)
            .unwrap_or(self.default_rest)
    }
}

impl Document {
    /// Commit a finished session: routine replace-by-id plus log append,
    /// produced as one new snapshot
    pub fn apply_session(&self, outcome: SessionOutcome) -> Document {
        let mut next = self.clone();
        if let Some(slot) = next
            .routines
            .iter_mut()
            .find(|r| r.id == outcome.routine.id)
        {
            *slot = outcome.routine;
        } else {
            // Routine was deleted mid-session; the log still counts
            tracing::warn!(
                "apply_session: routine {} no longer in document",
                outcome.routine.id
            );
        }
        next.logs.push(outcome.log);
        next
    }
}
