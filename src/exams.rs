//! End-of-subject exams.
//!
//! Once a class has received every hour of a subject, one two-slot exam is
//! placed on the day after its last regular session (Monday of the next week
//! when that session fell on Saturday). If that day is full the exam falls
//! back through [`FALLBACK_DAYS`] in the week of the last session.

use log::debug;

use crate::allocator::{eligible_teachers, least_loaded};
use crate::availability::{can_teach, class_is_busy};
use crate::data::{Class, Day, ScheduleEntry, ShortfallReason, SubjectRequirement, Teacher, Week};
use crate::slots::{self, EXAM_SLOTS, SLOT_COUNT};
use crate::state::{RunState, Session};

pub const FALLBACK_DAYS: [Day; 6] = [
    Day::Thursday,
    Day::Friday,
    Day::Wednesday,
    Day::Tuesday,
    Day::Monday,
    Day::Saturday,
];

pub fn exam_label(subject: &str) -> String {
    format!("{subject} Exam")
}

/// Day and week the exam should go to first, if still inside the run.
pub fn preferred_slot(last: &ScheduleEntry, number_of_weeks: u32) -> Option<(Day, Week)> {
    match last.day.next() {
        Some(day) => Some((day, last.week)),
        None if last.week < number_of_weeks => Some((Day::Monday, last.week + 1)),
        None => None,
    }
}

/// Ordered (day, week) candidates for the exam following `last`.
pub fn candidate_days(last: &ScheduleEntry, number_of_weeks: u32) -> Vec<(Day, Week)> {
    let preferred = preferred_slot(last, number_of_weeks);
    preferred
        .into_iter()
        .chain(
            FALLBACK_DAYS
                .iter()
                .map(|&day| (day, last.week))
                .filter(|&c| Some(c) != preferred),
        )
        .collect()
}

fn last_regular_session<'e>(
    entries: &'e [ScheduleEntry],
    class_name: &str,
    subject: &str,
) -> Option<&'e ScheduleEntry> {
    entries
        .iter()
        .filter(|e| !e.is_exam && e.class_name == class_name && e.subject == subject)
        .max_by_key(|e| (e.week, e.day, e.start_time))
}

/// Places the exam for a fully scheduled subject, or records why it could not.
pub fn schedule_exam(
    state: &mut RunState,
    teachers: &[Teacher],
    class: &Class,
    req: &SubjectRequirement,
    number_of_weeks: u32,
) {
    let Some(last) = last_regular_session(state.entries(), &class.name, &req.subject) else {
        return;
    };
    let last_week = last.week;
    let candidates = candidate_days(last, number_of_weeks);

    let eligible = eligible_teachers(teachers, req);
    let label = exam_label(&req.subject);

    for (day, week) in candidates {
        for start in 0..=SLOT_COUNT - EXAM_SLOTS {
            if !state.budget.spend() {
                state.record_shortfall(
                    &class.name,
                    &req.subject,
                    last_week,
                    ShortfallReason::ExamNotScheduled,
                );
                return;
            }

            let span = slots::span(start, EXAM_SLOTS);
            let entries = state.entries();
            if class_is_busy(&class.name, entries, day, span, week) {
                continue;
            }
            let teacher = least_loaded(
                eligible
                    .iter()
                    .copied()
                    .filter(|t| can_teach(t, entries, day, span, week)),
                |t| state.exam_load(&t.id, week),
            );
            let Some(teacher) = teacher else {
                continue;
            };

            let session = Session {
                teacher_id: &teacher.id,
                class_name: &class.name,
                subject: &label,
                is_exam: true,
            };
            state.push(&session, day, span, week);
            debug!(
                "{} / {label}: week {week} {day} {}-{} with {}",
                class.name, span.start, span.end, teacher.id
            );
            return;
        }
    }

    state.record_shortfall(
        &class.name,
        &req.subject,
        last_week,
        ShortfallReason::ExamNotScheduled,
    );
}
