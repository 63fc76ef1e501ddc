//! Default exercise library and library-level operations.
//!
//! New users start from a built-in library of common gym exercises.
//! Library edits never cascade: routines and old logs may keep dangling
//! `exercise_id` references, which display lookups degrade to a
//! placeholder name instead of failing.

use crate::types::{Document, ExerciseDef};
use once_cell::sync::Lazy;

/// Display fallback for a dangling exercise reference
pub const UNKNOWN_EXERCISE: &str = "Desconhecido";

/// Cached default library - built once and reused across all operations
static DEFAULT_EXERCISES: Lazy<Vec<ExerciseDef>> = Lazy::new(build_default_exercises);

/// The built-in exercise library seeded into every new user document
pub fn default_exercises() -> Vec<ExerciseDef> {
    DEFAULT_EXERCISES.clone()
}

fn def(
    id: &str,
    name: &str,
    muscle_group: &str,
    default_sets: u32,
    default_reps: &str,
    default_weight: f64,
) -> ExerciseDef {
    ExerciseDef {
        id: id.into(),
        name: name.into(),
        muscle_group: muscle_group.into(),
        default_sets,
        default_reps: default_reps.into(),
        default_weight,
    }
}

fn build_default_exercises() -> Vec<ExerciseDef> {
    vec![
        def("def_01", "Supino Reto com Barra", "Peitoral", 4, "8-12", 20.0),
        def("def_02", "Supino Inclinado com Halteres", "Peitoral", 3, "10-12", 14.0),
        def("def_03", "Crucifixo Máquina (Peck Deck)", "Peitoral", 3, "12-15", 30.0),
        def("def_04", "Puxada Alta (Polia)", "Costas", 4, "10-12", 40.0),
        def("def_05", "Remada Curvada", "Costas", 4, "8-10", 30.0),
        def("def_06", "Barra Fixa (Graviton)", "Costas", 3, "Falha", 0.0),
        def("def_07", "Agachamento Livre", "Pernas", 4, "8-10", 20.0),
        def("def_08", "Leg Press 45º", "Pernas", 4, "10-12", 80.0),
        def("def_09", "Cadeira Extensora", "Pernas", 3, "12-15", 30.0),
        def("def_10", "Mesa Flexora", "Pernas", 3, "12-15", 30.0),
        def("def_11", "Levantamento Terra", "Posterior/Costas", 3, "6-8", 60.0),
        def("def_12", "Desenvolvimento com Halteres", "Ombros", 4, "10-12", 12.0),
        def("def_13", "Elevação Lateral", "Ombros", 4, "12-15", 8.0),
        def("def_14", "Rosca Direta (Barra W)", "Bíceps", 3, "10-12", 10.0),
        def("def_15", "Rosca Martelo", "Bíceps", 3, "10-12", 10.0),
        def("def_16", "Tríceps Corda (Polia)", "Tríceps", 3, "12-15", 20.0),
        def("def_17", "Tríceps Testa", "Tríceps", 3, "10-12", 15.0),
        def("def_18", "Abdominal Supra", "Abdômen", 3, "15-20", 0.0),
        def("def_19", "Prancha Isométrica", "Abdômen", 3, "60s", 0.0),
        def("def_20", "Panturrilha Sentado", "Panturrilhas", 4, "15-20", 20.0),
    ]
}

/// Resolve an exercise definition by library id
pub fn find_exercise<'a>(exercises: &'a [ExerciseDef], id: &str) -> Option<&'a ExerciseDef> {
    exercises.iter().find(|e| e.id == id)
}

/// Display name for a library id, degrading to a placeholder when the
/// reference dangles
pub fn exercise_name<'a>(exercises: &'a [ExerciseDef], id: &str) -> &'a str {
    find_exercise(exercises, id)
        .map(|e| e.name.as_str())
        .unwrap_or(UNKNOWN_EXERCISE)
}

/// Insert or replace an exercise definition by id
pub fn upsert_exercise(document: &Document, exercise: ExerciseDef) -> Document {
    let mut next = document.clone();
    match next.exercises.iter_mut().find(|e| e.id == exercise.id) {
        Some(slot) => *slot = exercise,
        None => next.exercises.push(exercise),
    }
    next
}

/// Remove an exercise definition by id
///
/// Routine entries and logs referencing it are left untouched; their
/// lookups fall back to [`UNKNOWN_EXERCISE`] from then on.
pub fn remove_exercise(document: &Document, exercise_id: &str) -> Document {
    let mut next = document.clone();
    let before = next.exercises.len();
    next.exercises.retain(|e| e.id != exercise_id);
    if next.exercises.len() == before {
        tracing::debug!("remove_exercise: no library entry with id {}", exercise_id);
    }
    next
}
