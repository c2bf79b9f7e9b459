use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

// Type aliases for clarity
pub type TeacherId = String;
pub type ClassId = String;
pub type EntryId = u32;
pub type Week = u32;

/// A time of day, stored as minutes since midnight.
///
/// Serialized as `"HH:MM"` so that ordering never depends on string format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const fn from_hm(hour: u16, minute: u16) -> Self {
        TimeOfDay(hour * 60 + minute)
    }

    pub const fn minutes(self) -> u16 {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::InvalidTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !(1..=2).contains(&h.len()) || m.len() != 2 || !digits(h) || !digits(m) {
            return Err(invalid());
        }
        let hour: u16 = h.parse().map_err(|_| invalid())?;
        let minute: u16 = m.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(TimeOfDay::from_hm(hour, minute))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// The six working days, in scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The following working day, or `None` after Saturday.
    pub fn next(self) -> Option<Day> {
        Day::ALL.get(self.index() + 1).copied()
    }

    /// True when the two days sit next to each other in the week.
    pub fn is_adjacent(self, other: Day) -> bool {
        self.index().abs_diff(other.index()) == 1
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
        };
        f.write_str(name)
    }
}

/// A half-open `[start, end)` span of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Interval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Interval { start, end }
    }

    /// Three-way overlap test: the other span starts inside this one, this one
    /// starts inside the other, or this one swallows the other.
    pub fn overlaps(&self, other: &Interval) -> bool {
        (other.start <= self.start && other.end > self.start)
            || (other.start < self.end && other.end >= self.end)
            || (other.start >= self.start && other.end <= self.end)
    }
}

/// Per-day availability windows of a teacher. Windows may overlap or repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyAvailability {
    pub monday: Vec<Interval>,
    pub tuesday: Vec<Interval>,
    pub wednesday: Vec<Interval>,
    pub thursday: Vec<Interval>,
    pub friday: Vec<Interval>,
    pub saturday: Vec<Interval>,
}

impl WeeklyAvailability {
    pub fn on(&self, day: Day) -> &[Interval] {
        match day {
            Day::Monday => &self.monday,
            Day::Tuesday => &self.tuesday,
            Day::Wednesday => &self.wednesday,
            Day::Thursday => &self.thursday,
            Day::Friday => &self.friday,
            Day::Saturday => &self.saturday,
        }
    }

    pub fn on_mut(&mut self, day: Day) -> &mut Vec<Interval> {
        match day {
            Day::Monday => &mut self.monday,
            Day::Tuesday => &mut self.tuesday,
            Day::Wednesday => &mut self.wednesday,
            Day::Thursday => &mut self.thursday,
            Day::Friday => &mut self.friday,
            Day::Saturday => &mut self.saturday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub availability: WeeklyAvailability,
}

impl Teacher {
    pub fn teaches(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }
}

/// Hours a class needs for one subject, optionally pinned to one teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRequirement {
    pub subject: String,
    pub hours_per_week: u32,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    #[serde(default)]
    pub subject_requirements: Vec<SubjectRequirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub number_of_weeks: u32,
    #[serde(default)]
    pub exam_scheduling_enabled: bool,
    /// Carried through for display and export; allocation ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

/// The complete input for one generation run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    pub teachers: Vec<Teacher>,
    pub classes: Vec<Class>,
    pub settings: Settings,
}

/// A single scheduled session, regular or exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub day: Day,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub teacher_id: TeacherId,
    pub class_name: String,
    pub subject: String,
    #[serde(default)]
    pub is_exam: bool,
    pub week: Week,
}

impl ScheduleEntry {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }
}

/// Why some hours or an exam were left out of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ShortfallReason {
    NoEligibleTeacher { hours_owed: u32 },
    HoursUnplaced { hours_owed: u32 },
    SearchBudgetExhausted { hours_owed: u32 },
    ExamNotScheduled,
}

/// Describes requirements that the final schedule does not meet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortfall {
    pub class_name: String,
    pub subject: String,
    pub week: Week,
    pub reason: ShortfallReason,
}

impl Shortfall {
    pub fn hours_owed(&self) -> u32 {
        match self.reason {
            ShortfallReason::NoEligibleTeacher { hours_owed }
            | ShortfallReason::HoursUnplaced { hours_owed }
            | ShortfallReason::SearchBudgetExhausted { hours_owed } => hours_owed,
            ShortfallReason::ExamNotScheduled => 0,
        }
    }
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            ShortfallReason::NoEligibleTeacher { hours_owed } => write!(
                f,
                "[week {}] {} / {}: no eligible teacher, {} hours owed",
                self.week, self.class_name, self.subject, hours_owed
            ),
            ShortfallReason::HoursUnplaced { hours_owed } => write!(
                f,
                "[week {}] {} / {}: {} hours could not be placed",
                self.week, self.class_name, self.subject, hours_owed
            ),
            ShortfallReason::SearchBudgetExhausted { hours_owed } => write!(
                f,
                "[week {}] {} / {}: search budget exhausted, {} hours owed",
                self.week, self.class_name, self.subject, hours_owed
            ),
            ShortfallReason::ExamNotScheduled => write!(
                f,
                "[week {}] {} / {}: exam not scheduled",
                self.week, self.class_name, self.subject
            ),
        }
    }
}

/// The final output of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    pub entries: Vec<ScheduleEntry>,
    pub shortfalls: Vec<Shortfall>,
}
