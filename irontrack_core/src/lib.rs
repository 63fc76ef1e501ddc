#![forbid(unsafe_code)]

//! Core domain model and business logic for the IronTrack system.
//!
//! This crate provides:
//! - Domain types (exercise library, routines, splits, workout logs)
//! - Routine builder mutations and rotation logic
//! - The workout session state machine with carry-forward seeding
//! - History queries for progress charts
//! - Persistence (per-user JSON document store)
//! - The coach-chat boundary

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod routine;
pub mod session;
pub mod history;
pub mod store;
pub mod coach;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{default_exercises, exercise_name, find_exercise, UNKNOWN_EXERCISE};
pub use config::Config;
pub use routine::{delete_routine, save_routine, set_active_routine, validate_routine};
pub use session::{RestTimer, SessionOutcome, WorkoutSession};
pub use history::{progress_series, recent_progress, ProgressPoint};
pub use store::Store;
pub use coach::{Coach, GeminiCoach, COACH_FAILURE_MESSAGE};
