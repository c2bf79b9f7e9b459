use thiserror::Error;

use crate::data::{Day, TimeOfDay};

/// Input problems that make a generation request unusable.
///
/// Placement failures are never errors; they surface as shortfalls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid time of day {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("number of weeks must be at least 1 (got {0})")]
    InvalidWeekCount(u32),

    #[error("teacher {teacher_id} has an empty or inverted window on {day}: {start}-{end}")]
    InvalidAvailability {
        teacher_id: String,
        day: Day,
        start: TimeOfDay,
        end: TimeOfDay,
    },

    #[error("duplicate class name {0:?}")]
    DuplicateClassName(String),

    #[error("duplicate class id {0:?}")]
    DuplicateClassId(String),

    #[error("class {class_name:?} lists subject {subject:?} more than once")]
    DuplicateSubject { class_name: String, subject: String },

    #[error("duplicate teacher id {0:?}")]
    DuplicateTeacherId(String),

    #[error("{} input problems: {}", .0.len(), join(.0))]
    Multiple(Vec<InputError>),
}

fn join(errors: &[InputError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value:?}")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var} must be a positive integer: {value:?}")]
    InvalidBudget { var: &'static str, value: String },
}
