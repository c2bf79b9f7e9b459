//! Read-side helpers for the grid and export consumers.

use itertools::Itertools;

use crate::data::{Day, Interval, ScheduleEntry, Week};
use crate::slots::{self, SLOT_COUNT};

/// One class's entries for one week, ordered by day then start time.
pub fn class_week<'e>(
    entries: &'e [ScheduleEntry],
    class_name: &str,
    week: Week,
) -> Vec<&'e ScheduleEntry> {
    entries
        .iter()
        .filter(|e| e.class_name == class_name && e.week == week)
        .sorted_by_key(|e| (e.day, e.start_time))
        .collect()
}

/// A timetable row: one slot across the six days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow<'e> {
    pub slot: Interval,
    pub cells: [Option<&'e ScheduleEntry>; 6],
}

/// Slot rows by day columns. An exam shows up in every slot it covers.
pub fn grid<'e>(entries: &'e [ScheduleEntry], class_name: &str, week: Week) -> Vec<GridRow<'e>> {
    let week_entries = class_week(entries, class_name, week);
    (0..SLOT_COUNT)
        .map(|i| {
            let slot = slots::slot(i);
            let cells = Day::ALL.map(|day| {
                week_entries
                    .iter()
                    .copied()
                    .find(|e| e.day == day && slot.overlaps(&e.interval()))
            });
            GridRow { slot, cells }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TimeOfDay;

    fn entry(id: u32, class: &str, day: Day, start: u16, end: u16, week: Week) -> ScheduleEntry {
        ScheduleEntry {
            id,
            day,
            start_time: TimeOfDay::from_hm(start, 0),
            end_time: TimeOfDay::from_hm(end, 0),
            teacher_id: "t1".into(),
            class_name: class.into(),
            subject: "Math".into(),
            is_exam: end - start > 1,
            week,
        }
    }

    #[test]
    fn class_week_filters_and_orders() {
        let entries = vec![
            entry(1, "TA", Day::Friday, 8, 9, 1),
            entry(2, "TA", Day::Monday, 10, 11, 1),
            entry(3, "EM", Day::Monday, 8, 9, 1),
            entry(4, "TA", Day::Monday, 8, 9, 1),
            entry(5, "TA", Day::Monday, 8, 9, 2),
        ];
        let ids: Vec<u32> = class_week(&entries, "TA", 1).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn grid_spreads_exams_over_their_slots() {
        let entries = vec![entry(1, "TA", Day::Tuesday, 9, 11, 1)];
        let rows = grid(&entries, "TA", 1);
        assert_eq!(rows.len(), SLOT_COUNT);
        let tuesday = Day::Tuesday.index();
        assert!(rows[0].cells[tuesday].is_none());
        assert_eq!(rows[1].cells[tuesday].map(|e| e.id), Some(1));
        assert_eq!(rows[2].cells[tuesday].map(|e| e.id), Some(1));
        assert!(rows[3].cells[tuesday].is_none());
        assert!(rows[1].cells[Day::Monday.index()].is_none());
    }
}
