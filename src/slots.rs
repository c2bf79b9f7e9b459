//! The shared slot-boundary sequence.
//!
//! Boundaries run hourly from 08:00 to 18:00, giving ten one-hour slots per
//! day. Slot `i` spans `BOUNDARIES[i]..BOUNDARIES[i + 1]`.

use crate::data::{Interval, TimeOfDay};

pub const BOUNDARIES: [TimeOfDay; 11] = [
    TimeOfDay::from_hm(8, 0),
    TimeOfDay::from_hm(9, 0),
    TimeOfDay::from_hm(10, 0),
    TimeOfDay::from_hm(11, 0),
    TimeOfDay::from_hm(12, 0),
    TimeOfDay::from_hm(13, 0),
    TimeOfDay::from_hm(14, 0),
    TimeOfDay::from_hm(15, 0),
    TimeOfDay::from_hm(16, 0),
    TimeOfDay::from_hm(17, 0),
    TimeOfDay::from_hm(18, 0),
];

pub const SLOT_COUNT: usize = BOUNDARIES.len() - 1;

/// Longest block a regular session may occupy.
pub const MAX_BLOCK: usize = 4;

/// Consecutive slots taken by one exam.
pub const EXAM_SLOTS: usize = 2;

pub fn slot(index: usize) -> Interval {
    Interval::new(BOUNDARIES[index], BOUNDARIES[index + 1])
}

/// The span of `len` slots starting at `start`.
pub fn span(start: usize, len: usize) -> Interval {
    Interval::new(BOUNDARIES[start], BOUNDARIES[start + len])
}

/// A 4-hour block must sit wholly in the first four or the last four slots.
pub fn is_half_day_start(start: usize) -> bool {
    start == 0 || start == SLOT_COUNT - MAX_BLOCK
}
