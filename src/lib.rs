//! Weekly timetable generation for classes and teachers.
//!
//! A deterministic greedy engine: subject hours are spread across the
//! configured weeks, placed as contiguous blocks of one to four slots into the
//! working days, and each fully placed subject gets a trailing two-slot exam.
//! Anything that cannot be placed is reported as a [`data::Shortfall`] rather
//! than failing the run.

pub mod allocator;
pub mod audit;
pub mod availability;
pub mod config;
pub mod data;
pub mod distribution;
pub mod error;
pub mod exams;
pub mod server;
pub mod slots;
pub mod solver;
pub mod state;
pub mod view;

pub use data::{GenerationInput, GenerationOutput, ScheduleEntry, Settings, Shortfall};
pub use error::{ConfigError, InputError};
pub use solver::{generate, generate_with_budget, validate_input};
