//! Greedy weekly block allocation.
//!
//! # Algorithm
//!
//! For every week, classes are visited in a week-dependent rotation and each
//! subject requirement consumes its weekly target:
//!
//! 1. Walk Monday..Saturday, one block per day.
//! 2. On each day try block sizes 4, 3, 2, 1 (capped at the hours left).
//! 3. A 4-hour block must fit the morning or afternoon half; the days next to
//!    it are closed to the same subject for the rest of the week.
//! 4. The least loaded free teacher takes the block.
//!
//! Hours left over become shortfalls. When a subject's total hours are fully
//! placed its exam is scheduled straight away.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use itertools::Itertools;
use log::{debug, trace};

use crate::availability::{can_teach, class_is_busy};
use crate::data::{Class, ClassId, Day, ShortfallReason, SubjectRequirement, Teacher, Week};
use crate::distribution::DistributionPlan;
use crate::exams;
use crate::slots::{self, MAX_BLOCK, SLOT_COUNT};
use crate::state::{RunState, Session};

/// Teachers allowed to take a requirement: the pinned one only, or everyone
/// teaching the subject.
pub fn eligible_teachers<'t>(teachers: &'t [Teacher], req: &SubjectRequirement) -> Vec<&'t Teacher> {
    match req.teacher_id.as_deref() {
        Some(id) => teachers.iter().filter(|t| t.id == id).take(1).collect(),
        None => teachers.iter().filter(|t| t.teaches(&req.subject)).collect(),
    }
}

/// Lowest load wins, then the smallest teacher id.
pub fn least_loaded<'t>(
    candidates: impl Iterator<Item = &'t Teacher>,
    load: impl Fn(&Teacher) -> usize,
) -> Option<&'t Teacher> {
    candidates.min_by(|a, b| load(*a).cmp(&load(*b)).then_with(|| a.id.cmp(&b.id)))
}

/// Block sizes to try for `remaining` hours, largest first.
pub fn block_sizes(remaining: u32) -> Vec<usize> {
    (1..=MAX_BLOCK)
        .rev()
        .map(|size| size.min(remaining as usize))
        .filter(|&size| size > 0)
        .dedup()
        .collect()
}

/// Processing order of classes in `week`.
pub fn week_order(classes: &[Class], week: Week) -> Vec<&Class> {
    classes
        .iter()
        .sorted_by_key(|c| rotation_key(&c.name, week))
        .collect()
}

fn rotation_key(name: &str, week: Week) -> u32 {
    let first = name.chars().next().map_or(0, u32::from);
    (first + week) % 26
}

struct Block<'t> {
    start: usize,
    teacher: &'t Teacher,
}

pub struct BlockAllocator<'a> {
    teachers: &'a [Teacher],
    plan: &'a DistributionPlan,
    exams_enabled: bool,
    state: RunState,
    last_four_hour_day: HashMap<(ClassId, String, Week), Day>,
    placed: HashMap<(ClassId, String), u32>,
}

impl<'a> BlockAllocator<'a> {
    pub fn new(
        teachers: &'a [Teacher],
        plan: &'a DistributionPlan,
        exams_enabled: bool,
        state: RunState,
    ) -> Self {
        BlockAllocator {
            teachers,
            plan,
            exams_enabled,
            state,
            last_four_hour_day: HashMap::new(),
            placed: HashMap::new(),
        }
    }

    pub fn run(mut self, classes: &[Class]) -> RunState {
        // weeks past the last non-zero target have nothing to place
        let last_week = self.plan.last_busy_week();
        for week in 1..=last_week {
            if self.state.budget.is_exhausted() {
                self.write_off(classes, week..=last_week);
                break;
            }
            for class in week_order(classes, week) {
                for req in &class.subject_requirements {
                    self.allocate(class, req, week);
                }
            }
        }
        self.state
    }

    /// Records every non-zero target in `weeks` as owed without searching.
    fn write_off(&mut self, classes: &[Class], weeks: RangeInclusive<Week>) {
        for week in weeks {
            for class in week_order(classes, week) {
                for req in &class.subject_requirements {
                    let target = self.plan.hours(&class.id, &req.subject, week);
                    if target > 0 {
                        self.state.record_shortfall(
                            &class.name,
                            &req.subject,
                            week,
                            ShortfallReason::SearchBudgetExhausted { hours_owed: target },
                        );
                    }
                }
            }
        }
    }

    fn allocate(&mut self, class: &Class, req: &SubjectRequirement, week: Week) {
        let target = self.plan.hours(&class.id, &req.subject, week);
        if target == 0 {
            return;
        }
        if self.state.budget.is_exhausted() {
            self.state.record_shortfall(
                &class.name,
                &req.subject,
                week,
                ShortfallReason::SearchBudgetExhausted { hours_owed: target },
            );
            return;
        }

        let eligible = eligible_teachers(self.teachers, req);
        if eligible.is_empty() {
            self.state.record_shortfall(
                &class.name,
                &req.subject,
                week,
                ShortfallReason::NoEligibleTeacher { hours_owed: target },
            );
            return;
        }

        let key = (class.id.clone(), req.subject.clone(), week);
        let mut remaining = target;
        let mut used_days: Vec<Day> = Vec::new();

        for day in Day::ALL {
            if remaining == 0 || self.state.budget.is_exhausted() {
                break;
            }
            if let Some(&block_day) = self.last_four_hour_day.get(&key) {
                if day.is_adjacent(block_day) {
                    trace!(
                        "{} / {} week {week}: {day} closed by the 4-hour block on {block_day}",
                        class.name,
                        req.subject
                    );
                    continue;
                }
            }

            for size in block_sizes(remaining) {
                // a 4-hour block never lands next to a day already holding this subject
                if size == MAX_BLOCK && used_days.iter().any(|d| d.is_adjacent(day)) {
                    continue;
                }
                let Some(block) = self.find_block(&class.name, &eligible, day, week, size) else {
                    continue;
                };

                let session = Session {
                    teacher_id: &block.teacher.id,
                    class_name: &class.name,
                    subject: &req.subject,
                    is_exam: false,
                };
                for slot in block.start..block.start + size {
                    self.state.push(&session, day, slots::slot(slot), week);
                }
                debug!(
                    "{} / {} week {week}: {size}h on {day} at {} with {}",
                    class.name,
                    req.subject,
                    slots::slot(block.start).start,
                    block.teacher.id
                );

                remaining -= size as u32;
                used_days.push(day);
                if size == MAX_BLOCK {
                    self.last_four_hour_day.insert(key.clone(), day);
                }
                break;
            }
        }

        if remaining > 0 {
            let reason = if self.state.budget.is_exhausted() {
                ShortfallReason::SearchBudgetExhausted { hours_owed: remaining }
            } else {
                ShortfallReason::HoursUnplaced { hours_owed: remaining }
            };
            self.state.record_shortfall(&class.name, &req.subject, week, reason);
        }

        let placed_now = target - remaining;
        let placed = self
            .placed
            .entry((class.id.clone(), req.subject.clone()))
            .or_insert(0);
        *placed += placed_now;
        if self.exams_enabled && placed_now > 0 && *placed == req.hours_per_week {
            exams::schedule_exam(&mut self.state, self.teachers, class, req, self.plan.weeks());
        }
    }

    /// First start position on `day` where the class is free and some eligible
    /// teacher can take all `size` slots.
    fn find_block<'t>(
        &mut self,
        class_name: &str,
        eligible: &[&'t Teacher],
        day: Day,
        week: Week,
        size: usize,
    ) -> Option<Block<'t>> {
        for start in 0..=SLOT_COUNT - size {
            if size == MAX_BLOCK && !slots::is_half_day_start(start) {
                continue;
            }
            if !self.state.budget.spend() {
                return None;
            }

            let span = slots::span(start, size);
            let entries = self.state.entries();
            if class_is_busy(class_name, entries, day, span, week) {
                continue;
            }
            let teacher = least_loaded(
                eligible
                    .iter()
                    .copied()
                    .filter(|t| can_teach(t, entries, day, span, week)),
                |t| self.state.week_load(&t.id, week),
            );
            if let Some(teacher) = teacher {
                return Some(Block { start, teacher });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Interval, TimeOfDay, WeeklyAvailability};
    use crate::distribution;
    use crate::state::SearchBudget;

    fn teacher(id: &str, subjects: &[&str], days: &[Day], from: u16, to: u16) -> Teacher {
        let mut availability = WeeklyAvailability::default();
        for &day in days {
            availability
                .on_mut(day)
                .push(Interval::new(TimeOfDay::from_hm(from, 0), TimeOfDay::from_hm(to, 0)));
        }
        Teacher {
            id: id.into(),
            name: id.to_uppercase(),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            availability,
        }
    }

    fn class(id: &str, name: &str, reqs: &[(&str, u32)]) -> Class {
        Class {
            id: id.into(),
            name: name.into(),
            subject_requirements: reqs
                .iter()
                .map(|(subject, hours)| SubjectRequirement {
                    subject: subject.to_string(),
                    hours_per_week: *hours,
                    teacher_id: None,
                })
                .collect(),
        }
    }

    fn run(teachers: &[Teacher], classes: &[Class], weeks: u32) -> RunState {
        let plan = distribution::plan(classes, weeks).unwrap();
        BlockAllocator::new(teachers, &plan, false, RunState::new(SearchBudget::unbounded()))
            .run(classes)
    }

    #[test]
    fn block_sizes_shrink_and_cap() {
        assert_eq!(block_sizes(9), vec![4, 3, 2, 1]);
        assert_eq!(block_sizes(3), vec![3, 2, 1]);
        assert_eq!(block_sizes(2), vec![2, 1]);
        assert_eq!(block_sizes(1), vec![1]);
        assert!(block_sizes(0).is_empty());
    }

    #[test]
    fn week_order_rotates_deterministically() {
        let classes = vec![class("1", "A", &[]), class("2", "B", &[])];
        // 'A' = 65, 'B' = 66: week 1 keys 14/15, week 12 keys 25/0
        let names = |week| week_order(&classes, week).iter().map(|c| c.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(1), vec!["A", "B"]);
        assert_eq!(names(12), vec!["B", "A"]);
    }

    #[test]
    fn pinned_teacher_is_the_only_candidate() {
        let teachers = vec![
            teacher("t1", &["Math"], &[Day::Monday], 8, 12),
            teacher("t2", &["Physics"], &[Day::Monday], 8, 12),
        ];
        let mut req = SubjectRequirement {
            subject: "Math".into(),
            hours_per_week: 2,
            teacher_id: Some("t2".into()),
        };
        let ids: Vec<_> = eligible_teachers(&teachers, &req).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t2"]);

        req.teacher_id = Some("missing".into());
        assert!(eligible_teachers(&teachers, &req).is_empty());
    }

    #[test]
    fn tie_break_prefers_smaller_id() {
        let teachers = vec![
            teacher("t2", &["Math"], &[Day::Monday], 8, 12),
            teacher("t1", &["Math"], &[Day::Monday], 8, 12),
        ];
        let picked = least_loaded(teachers.iter(), |_| 0).unwrap();
        assert_eq!(picked.id, "t1");
        let picked = least_loaded(teachers.iter(), |t| if t.id == "t1" { 3 } else { 1 }).unwrap();
        assert_eq!(picked.id, "t2");
    }

    #[test]
    fn four_hour_block_closes_the_next_day() {
        let weekdays = [Day::Monday, Day::Tuesday, Day::Wednesday, Day::Thursday, Day::Friday];
        let teachers = vec![teacher("t1", &["Math"], &weekdays, 8, 12)];
        let classes = vec![class("c1", "TA", &[("Math", 5)])];
        let state = run(&teachers, &classes, 1);

        let entries = state.entries();
        assert_eq!(entries.len(), 5);
        assert!(entries[..4].iter().all(|e| e.day == Day::Monday));
        assert_eq!(entries[0].start_time, TimeOfDay::from_hm(8, 0));
        assert_eq!(entries[3].end_time, TimeOfDay::from_hm(12, 0));
        assert_eq!(entries[4].day, Day::Wednesday);
        assert!(state.shortfalls().is_empty());
    }

    #[test]
    fn four_hour_block_may_not_straddle_noon() {
        // free 10:00-14:00 only: four consecutive hours exist but cross the midpoint
        let teachers = vec![teacher("t1", &["Art"], &[Day::Monday], 10, 14)];
        let classes = vec![class("c1", "TA", &[("Art", 4)])];
        let state = run(&teachers, &classes, 1);

        let entries = state.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].start_time, TimeOfDay::from_hm(10, 0));
        assert_eq!(state.shortfalls().len(), 1);
        assert_eq!(state.shortfalls()[0].hours_owed(), 1);
    }

    #[test]
    fn one_block_per_day() {
        let teachers = vec![teacher("t1", &["Math"], &[Day::Monday, Day::Thursday], 8, 18)];
        let classes = vec![class("c1", "TA", &[("Math", 3)])];
        let state = run(&teachers, &classes, 1);
        let days: Vec<Day> = state.entries().iter().map(|e| e.day).dedup().collect();
        assert_eq!(days, vec![Day::Monday]);
        assert_eq!(state.entries().len(), 3);
    }

    #[test]
    fn teacher_is_never_double_booked_across_classes() {
        let teachers = vec![teacher("t1", &["Math"], &[Day::Monday], 8, 10)];
        let classes = vec![
            class("c1", "TA", &[("Math", 2)]),
            class("c2", "EM", &[("Math", 2)]),
        ];
        let state = run(&teachers, &classes, 1);
        assert_eq!(state.entries().len(), 2);
        assert_eq!(state.shortfalls().len(), 1);
        assert_eq!(state.shortfalls()[0].hours_owed(), 2);
    }

    #[test]
    fn load_balances_between_equal_teachers() {
        let teachers = vec![
            teacher("t1", &["Math"], &Day::ALL, 8, 18),
            teacher("t2", &["Math"], &Day::ALL, 8, 18),
        ];
        let classes = vec![
            class("c1", "TA", &[("Math", 2)]),
            class("c2", "TB", &[("Math", 2)]),
        ];
        let state = run(&teachers, &classes, 1);
        let by_teacher = state.entries().iter().counts_by(|e| e.teacher_id.clone());
        assert_eq!(by_teacher.get("t1"), Some(&2));
        assert_eq!(by_teacher.get("t2"), Some(&2));
    }

    #[test]
    fn exhausted_budget_turns_targets_into_shortfalls() {
        let teachers = vec![teacher("t1", &["Math"], &Day::ALL, 8, 18)];
        let classes = vec![class("c1", "TA", &[("Math", 2), ("Math2", 1)])];
        let plan = distribution::plan(&classes, 1).unwrap();
        let state = BlockAllocator::new(&teachers, &plan, false, RunState::new(SearchBudget::new(Some(0))))
            .run(&classes);
        assert!(state.entries().is_empty());
        assert_eq!(state.shortfalls().len(), 2);
        assert!(state
            .shortfalls()
            .iter()
            .all(|s| matches!(s.reason, ShortfallReason::SearchBudgetExhausted { .. })));
    }

    #[test]
    fn budget_runs_out_partway_and_later_weeks_are_written_off() {
        let teachers = vec![teacher("t1", &["Math"], &Day::ALL, 8, 18)];
        let classes = vec![class("c1", "TA", &[("Math", 10)])];
        let plan = distribution::plan(&classes, 5).unwrap();
        // each 2-hour block is found at the first start tried
        let state = BlockAllocator::new(&teachers, &plan, false, RunState::new(SearchBudget::new(Some(2))))
            .run(&classes);
        assert_eq!(state.entries().len(), 4);
        let owed: Vec<(Week, u32)> = state.shortfalls().iter().map(|s| (s.week, s.hours_owed())).collect();
        assert_eq!(owed, vec![(3, 2), (4, 2), (5, 2)]);
    }

    #[test]
    fn weeks_beyond_the_last_target_are_not_walked() {
        let teachers = vec![teacher("t1", &["Math"], &Day::ALL, 8, 18)];
        let classes = vec![class("c1", "TA", &[("Math", 2)])];
        let plan = distribution::plan(&classes, 300_000_000).unwrap();
        let state = BlockAllocator::new(&teachers, &plan, false, RunState::new(SearchBudget::new(Some(10))))
            .run(&classes);
        assert_eq!(state.entries().len(), 2);
        assert!(state.shortfalls().is_empty());
        assert_eq!(state.entries()[1].week, 2);
    }
}
