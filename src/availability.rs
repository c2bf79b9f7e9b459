//! Free/busy predicates over teacher availability and the entries placed so far.

use itertools::Itertools;

use crate::data::{Day, Interval, ScheduleEntry, Teacher, Week};

/// Collapses overlapping or touching windows into their union, sorted by start.
pub fn coverage(windows: &[Interval]) -> Vec<Interval> {
    windows
        .iter()
        .filter(|w| w.start < w.end)
        .sorted_by_key(|w| (w.start, w.end))
        .copied()
        .coalesce(|a, b| {
            if b.start <= a.end {
                Ok(Interval::new(a.start, a.end.max(b.end)))
            } else {
                Err((a, b))
            }
        })
        .collect()
}

/// True iff the teacher's windows for `day` fully cover `span`.
pub fn is_available(teacher: &Teacher, day: Day, span: Interval) -> bool {
    coverage(teacher.availability.on(day))
        .iter()
        .any(|w| w.start <= span.start && w.end >= span.end)
}

/// True iff the teacher already holds an entry overlapping `span` on that day and week.
pub fn is_booked(
    teacher_id: &str,
    entries: &[ScheduleEntry],
    day: Day,
    span: Interval,
    week: Week,
) -> bool {
    entries.iter().any(|e| {
        e.teacher_id == teacher_id && e.day == day && e.week == week && span.overlaps(&e.interval())
    })
}

/// True iff the class already has a session overlapping `span` on that day and week.
pub fn class_is_busy(
    class_name: &str,
    entries: &[ScheduleEntry],
    day: Day,
    span: Interval,
    week: Week,
) -> bool {
    entries.iter().any(|e| {
        e.class_name == class_name && e.day == day && e.week == week && span.overlaps(&e.interval())
    })
}

/// Free and unbooked for the whole span.
pub fn can_teach(
    teacher: &Teacher,
    entries: &[ScheduleEntry],
    day: Day,
    span: Interval,
    week: Week,
) -> bool {
    is_available(teacher, day, span) && !is_booked(&teacher.id, entries, day, span, week)
}
