//! Core domain types for the IronTrack system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise definitions (the user's exercise library)
//! - Routines, splits and their per-routine exercise entries
//! - Performed sets and last-performance carry-forward caches
//! - Immutable workout logs
//! - The whole-user `Document` aggregate
//!
//! Field names serialize in camelCase so a persisted document stays
//! readable next to exports from older versions of the app.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a fresh identifier for any document entity
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// Exercise Library Types
// ============================================================================

/// An exercise definition in the user's library (e.g. "Supino Reto com Barra")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDef {
    pub id: String,
    pub name: String,
    pub muscle_group: String,
    pub default_sets: u32,
    /// Free-form rep token: "8-12", "15", "60s", "Falha". Never parsed here.
    pub default_reps: String,
    pub default_weight: f64,
}

/// How a routine exercise is meant to be executed
///
/// The engine never branches on this today, but keeping it a closed enum
/// means any future branching stays exhaustively checkable.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ExecutionStyle {
    #[default]
    Normal,
    #[serde(rename = "Bi-Set")]
    BiSet,
    #[serde(rename = "Drop-Set")]
    DropSet,
    #[serde(rename = "Rest-Pause")]
    RestPause,
}

// ============================================================================
// Routine Types
// ============================================================================

/// One set as recorded during a workout session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformedSet {
    /// Same free-form token contract as [`ExerciseDef::default_reps`]
    pub reps: String,
    pub weight: f64,
    pub completed: bool,
}

/// Cache of the most recent session result for one routine slot
///
/// This is a carry-forward seed for the next session, not historical truth.
/// The append-only log sequence is the historical record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LastPerformance {
    pub date: DateTime<Utc>,
    pub sets: Vec<PerformedSet>,
}

/// An exercise assigned to a specific routine split
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineExercise {
    /// Unique id of this entry within the routine (not the library id)
    pub id: String,
    /// Reference into the exercise library; may dangle after a library delete
    pub exercise_id: String,
    pub target_sets: u32,
    pub target_reps: String,
    pub rest_time_seconds: u32,
    pub execution_style: ExecutionStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_performance: Option<LastPerformance>,
}

/// One named sub-workout within a routine ("A", "Push", "Pernas")
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineSplit {
    pub id: String,
    pub name: String,
    pub exercises: Vec<RoutineExercise>,
}

/// An ordered rotation of splits
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub name: String,
    pub splits: Vec<RoutineSplit>,
    /// Which split is performed next; `< splits.len()` whenever splits is non-empty
    pub current_split_index: usize,
}

impl Routine {
    /// Create an empty draft routine. Unstartable until a split is added.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            splits: Vec::new(),
            current_split_index: 0,
        }
    }

    /// The split the next session will be built from
    pub fn current_split(&self) -> Option<&RoutineSplit> {
        self.splits.get(self.current_split_index)
    }
}

// ============================================================================
// Workout Log Types
// ============================================================================

/// One exercise's recorded sets within a workout log
///
/// `exercise_name` is a snapshot taken at finish time so history survives
/// later library edits and deletions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedExercise {
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: Vec<PerformedSet>,
}

/// An immutable record of one finished session
///
/// Created once by the session engine, appended to the document's log
/// sequence and never edited afterwards. `split_name` is a snapshot, not a
/// live reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    pub date: DateTime<Utc>,
    pub routine_id: String,
    pub split_name: String,
    pub exercises: Vec<LoggedExercise>,
}

// ============================================================================
// Document Aggregate
// ============================================================================

/// The whole-user aggregate: everything persisted for one user
///
/// Mutations are copy-on-write: every operation produces a new `Document`
/// value which the caller persists as a full overwrite.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub exercises: Vec<ExerciseDef>,
    pub routines: Vec<Routine>,
    /// If set, must reference an existing routine
    pub active_routine_id: Option<String>,
    pub logs: Vec<WorkoutLog>,
}

impl Document {
    /// Starting document for a new user: default exercise library, no
    /// routines, no history
    pub fn new_user() -> Self {
        Self {
            exercises: crate::catalog::default_exercises(),
            routines: Vec::new(),
            active_routine_id: None,
            logs: Vec::new(),
        }
    }

    /// Resolve the active routine, if any
    ///
    /// Returns `None` both when no routine is active and when the pointer
    /// dangles; callers treat either as "no active routine".
    pub fn active_routine(&self) -> Option<&Routine> {
        let id = self.active_routine_id.as_deref()?;
        self.routines.iter().find(|r| r.id == id)
    }
}
