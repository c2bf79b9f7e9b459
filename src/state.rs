//! Run-local state: built fresh for every generation call, never shared.

use log::warn;

use crate::data::{
    Day, EntryId, GenerationOutput, Interval, ScheduleEntry, Shortfall, ShortfallReason, Week,
};

/// Caps the number of candidate placements one run may evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    remaining: Option<u64>,
}

impl SearchBudget {
    pub fn new(limit: Option<u64>) -> Self {
        SearchBudget { remaining: limit }
    }

    pub fn unbounded() -> Self {
        SearchBudget { remaining: None }
    }

    /// Consumes one unit, returning `false` once nothing is left.
    pub fn spend(&mut self) -> bool {
        match &mut self.remaining {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

/// The growing entry list of one run plus its shortfall log and id counter.
#[derive(Debug)]
pub struct RunState {
    entries: Vec<ScheduleEntry>,
    shortfalls: Vec<Shortfall>,
    next_id: EntryId,
    pub budget: SearchBudget,
}

/// Who and what a new entry is for.
pub struct Session<'s> {
    pub teacher_id: &'s str,
    pub class_name: &'s str,
    pub subject: &'s str,
    pub is_exam: bool,
}

impl RunState {
    pub fn new(budget: SearchBudget) -> Self {
        RunState {
            entries: Vec::new(),
            shortfalls: Vec::new(),
            next_id: 1,
            budget,
        }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn shortfalls(&self) -> &[Shortfall] {
        &self.shortfalls
    }

    pub fn push(&mut self, session: &Session<'_>, day: Day, span: Interval, week: Week) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(ScheduleEntry {
            id,
            day,
            start_time: span.start,
            end_time: span.end,
            teacher_id: session.teacher_id.to_string(),
            class_name: session.class_name.to_string(),
            subject: session.subject.to_string(),
            is_exam: session.is_exam,
            week,
        });
        id
    }

    pub fn record_shortfall(&mut self, class_name: &str, subject: &str, week: Week, reason: ShortfallReason) {
        let shortfall = Shortfall {
            class_name: class_name.to_string(),
            subject: subject.to_string(),
            week,
            reason,
        };
        warn!("{shortfall}");
        self.shortfalls.push(shortfall);
    }

    /// Entries (regular and exam) the teacher holds in `week`.
    pub fn week_load(&self, teacher_id: &str, week: Week) -> usize {
        self.entries
            .iter()
            .filter(|e| e.teacher_id == teacher_id && e.week == week)
            .count()
    }

    /// Exam entries the teacher holds in `week`.
    pub fn exam_load(&self, teacher_id: &str, week: Week) -> usize {
        self.entries
            .iter()
            .filter(|e| e.teacher_id == teacher_id && e.week == week && e.is_exam)
            .count()
    }

    pub fn into_output(self) -> GenerationOutput {
        GenerationOutput {
            entries: self.entries,
            shortfalls: self.shortfalls,
        }
    }
}
