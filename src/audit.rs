//! Post-generation invariant checks over a finished entry list.

use std::fmt;

use itertools::Itertools;

use crate::data::{Day, EntryId, ScheduleEntry, Week};
use crate::slots::MAX_BLOCK;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two sessions of one class overlap.
    ClassCollision {
        class_name: String,
        day: Day,
        week: Week,
        entries: (EntryId, EntryId),
    },
    /// Two sessions of one teacher overlap.
    TeacherOverlap {
        teacher_id: String,
        day: Day,
        week: Week,
        entries: (EntryId, EntryId),
    },
    /// A subject meets on the day next to one of its 4-hour blocks.
    GapRule {
        class_name: String,
        subject: String,
        week: Week,
        block_day: Day,
        neighbour: Day,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ClassCollision { class_name, day, week, entries } => write!(
                f,
                "class {class_name} double-booked on {day} week {week} (entries {} and {})",
                entries.0, entries.1
            ),
            Violation::TeacherOverlap { teacher_id, day, week, entries } => write!(
                f,
                "teacher {teacher_id} double-booked on {day} week {week} (entries {} and {})",
                entries.0, entries.1
            ),
            Violation::GapRule { class_name, subject, week, block_day, neighbour } => write!(
                f,
                "{class_name} / {subject} week {week}: session on {neighbour} \
                 next to the 4-hour block on {block_day}"
            ),
        }
    }
}

fn overlapping_pairs<'e, K>(
    entries: &'e [ScheduleEntry],
    key: impl Fn(&ScheduleEntry) -> K,
) -> Vec<(K, &'e ScheduleEntry, &'e ScheduleEntry)>
where
    K: std::hash::Hash + Eq + Ord + Clone,
{
    entries
        .iter()
        .into_group_map_by(|e| key(*e))
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .flat_map(|(k, group)| {
            group
                .into_iter()
                .tuple_combinations()
                .filter(|(a, b)| a.interval().overlaps(&b.interval()))
                .map(move |(a, b)| (k.clone(), a, b))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn gap_rule(entries: &[ScheduleEntry]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let by_subject = entries
        .iter()
        .filter(|e| !e.is_exam)
        .into_group_map_by(|e| (e.class_name.clone(), e.subject.clone(), e.week));

    let groups = by_subject.into_iter().sorted_by(|a, b| a.0.cmp(&b.0));
    for ((class_name, subject, week), group) in groups {
        let per_day = group.iter().counts_by(|e| e.day);
        let block_days = per_day
            .iter()
            .filter(|(_, n)| **n >= MAX_BLOCK)
            .map(|(day, _)| *day)
            .sorted();
        for block_day in block_days {
            for &neighbour in Day::ALL.iter().filter(|d| d.is_adjacent(block_day)) {
                if per_day.contains_key(&neighbour) {
                    violations.push(Violation::GapRule {
                        class_name: class_name.clone(),
                        subject: subject.clone(),
                        week,
                        block_day,
                        neighbour,
                    });
                }
            }
        }
    }
    violations
}

/// Every violated scheduling invariant in `entries`; empty for a sound schedule.
pub fn audit(entries: &[ScheduleEntry]) -> Vec<Violation> {
    let classes = overlapping_pairs(entries, |e| (e.class_name.clone(), e.day, e.week))
        .into_iter()
        .map(|((class_name, day, week), a, b)| Violation::ClassCollision {
            class_name,
            day,
            week,
            entries: (a.id, b.id),
        });
    let teachers = overlapping_pairs(entries, |e| (e.teacher_id.clone(), e.day, e.week))
        .into_iter()
        .map(|((teacher_id, day, week), a, b)| Violation::TeacherOverlap {
            teacher_id,
            day,
            week,
            entries: (a.id, b.id),
        });

    classes.chain(teachers).chain(gap_rule(entries)).collect()
}
