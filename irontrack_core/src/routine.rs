//! Routine builder mutations and document-level routine operations.
//!
//! Draft edits (adding splits, wiring exercises in) happen on an owned
//! `Routine` value; nothing reaches the document until `save_routine`
//! validates and upserts the whole draft. Document-level operations are
//! copy-on-write: they take the current document and return the next
//! snapshot, leaving the input untouched.

use crate::catalog::find_exercise;
use crate::types::{new_id, Document, ExerciseDef, Routine, RoutineExercise, RoutineSplit};
use crate::{Error, Result};

/// Rest seconds seeded into a freshly added routine exercise
pub const DEFAULT_REST_SECONDS: u32 = 60;

impl Routine {
    /// Append a new split with an empty exercise list
    ///
    /// The name is stored verbatim; presentation concerns like uppercasing
    /// belong to the caller.
    pub fn add_split(&mut self, name: impl Into<String>) -> &mut RoutineSplit {
        self.splits.push(RoutineSplit {
            id: new_id(),
            name: name.into(),
            exercises: Vec::new(),
        });
        self.splits.last_mut().expect("split just pushed")
    }

    /// Remove a split by id; unknown ids are no-ops
    ///
    /// Restores the rotation invariant: when `current_split_index` falls out
    /// of range it resets to 0. A routine emptied of splits becomes
    /// unstartable until another split is added.
    pub fn remove_split(&mut self, split_id: &str) {
        self.splits.retain(|s| s.id != split_id);
        if self.current_split_index >= self.splits.len() {
            self.current_split_index = 0;
        }
    }

    /// Find a split by id for further draft editing
    pub fn split_mut(&mut self, split_id: &str) -> Option<&mut RoutineSplit> {
        self.splits.iter_mut().find(|s| s.id == split_id)
    }
}

impl RoutineSplit {
    /// Add an exercise entry seeded from its library definition
    ///
    /// Silent no-op when `exercise_def_id` does not resolve; collaborators
    /// are responsible for only offering valid ids.
    pub fn add_exercise(&mut self, library: &[ExerciseDef], exercise_def_id: &str) {
        let Some(base) = find_exercise(library, exercise_def_id) else {
            tracing::debug!(
                "add_exercise: library id {} does not resolve, ignoring",
                exercise_def_id
            );
            return;
        };

        self.exercises.push(RoutineExercise {
            id: new_id(),
            exercise_id: base.id.clone(),
            target_sets: base.default_sets,
            target_reps: base.default_reps.clone(),
            rest_time_seconds: DEFAULT_REST_SECONDS,
            execution_style: Default::default(),
            last_performance: None,
        });
    }

    /// Remove an entry by its routine-exercise id; unknown ids are no-ops
    pub fn remove_exercise(&mut self, routine_exercise_id: &str) {
        self.exercises.retain(|e| e.id != routine_exercise_id);
    }

    /// Edit one entry in place; unknown ids are no-ops
    pub fn update_exercise<F>(&mut self, routine_exercise_id: &str, f: F)
    where
        F: FnOnce(&mut RoutineExercise),
    {
        if let Some(entry) = self
            .exercises
            .iter_mut()
            .find(|e| e.id == routine_exercise_id)
        {
            f(entry);
        }
    }
}

/// Check whether a draft routine may be saved
///
/// A routine is saveable only with a non-empty name and at least one split.
pub fn validate_routine(routine: &Routine) -> Result<()> {
    if routine.name.trim().is_empty() {
        return Err(Error::Validation("routine needs a name".into()));
    }
    if routine.splits.is_empty() {
        return Err(Error::Validation("routine needs at least one split".into()));
    }
    Ok(())
}

/// Upsert a routine into the document
///
/// Rejects unsaveable drafts with [`Error::Validation`], leaving the
/// document unchanged. When the document has no active routine yet, the
/// saved routine becomes active automatically.
pub fn save_routine(document: &Document, routine: Routine) -> Result<Document> {
    validate_routine(&routine)?;

    let mut next = document.clone();
    let id = routine.id.clone();
    match next.routines.iter_mut().find(|r| r.id == id) {
        Some(slot) => *slot = routine,
        None => next.routines.push(routine),
    }
    if next.active_routine_id.is_none() {
        tracing::info!("no active routine yet, activating {}", id);
        next.active_routine_id = Some(id);
    }
    Ok(next)
}

/// Mark a routine as the one sessions start from
///
/// Unknown ids are ignored with a warning so the active pointer can never
/// dangle through this path.
pub fn set_active_routine(document: &Document, routine_id: &str) -> Document {
    let mut next = document.clone();
    if next.routines.iter().any(|r| r.id == routine_id) {
        next.active_routine_id = Some(routine_id.to_string());
    } else {
        tracing::warn!("set_active_routine: unknown routine {}", routine_id);
    }
    next
}

/// Delete a routine by id
///
/// Clears the active pointer when it referenced the deleted routine. Logs
/// referencing the routine are historical records and stay untouched.
pub fn delete_routine(document: &Document, routine_id: &str) -> Document {
    let mut next = document.clone();
    next.routines.retain(|r| r.id != routine_id);
    if next.active_routine_id.as_deref() == Some(routine_id) {
        next.active_routine_id = None;
    }
    next
}
