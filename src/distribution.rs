//! Spreads each subject's hours over the configured number of weeks.

use std::collections::HashMap;

use crate::data::{Class, ClassId, Week};
use crate::error::InputError;

/// Per (class id, subject) totals; weekly targets are derived on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionPlan {
    weeks: u32,
    totals: HashMap<(ClassId, String), u32>,
}

impl DistributionPlan {
    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    /// Target hours for the week, zero for unknown pairs or weeks.
    pub fn hours(&self, class_id: &str, subject: &str, week: Week) -> u32 {
        if week < 1 || week > self.weeks {
            return 0;
        }
        self.totals
            .get(&(class_id.to_string(), subject.to_string()))
            .map_or(0, |&total| week_hours(total, self.weeks, week))
    }

    /// Last week with a non-zero target for any pair; later weeks are empty.
    pub fn last_busy_week(&self) -> Week {
        self.totals
            .values()
            .map(|&total| total.min(self.weeks))
            .max()
            .unwrap_or(0)
    }
}

/// Target for `week` (1-based) when `total` hours are spread over `weeks`:
/// everyone gets the floor, the first `total % weeks` weeks get one more.
pub fn week_hours(total: u32, weeks: u32, week: Week) -> u32 {
    let base = total / weeks;
    let remainder = total % weeks;
    base + u32::from(week <= remainder)
}

pub fn plan(classes: &[Class], number_of_weeks: u32) -> Result<DistributionPlan, InputError> {
    if number_of_weeks < 1 {
        return Err(InputError::InvalidWeekCount(number_of_weeks));
    }

    let mut totals = HashMap::new();
    for class in classes {
        for req in &class.subject_requirements {
            totals.insert((class.id.clone(), req.subject.clone()), req.hours_per_week);
        }
    }

    Ok(DistributionPlan {
        weeks: number_of_weeks,
        totals,
    })
}
