use std::collections::HashSet;
use std::time::Instant;

use log::{info, trace, warn};

use crate::allocator::BlockAllocator;
use crate::audit;
use crate::data::{Day, GenerationInput, GenerationOutput};
use crate::distribution;
use crate::error::InputError;
use crate::state::{RunState, SearchBudget};

/// Generates a timetable with no cap on the search.
pub fn generate(input: &GenerationInput) -> Result<GenerationOutput, InputError> {
    generate_with_budget(input, None)
}

/// Generates a timetable, evaluating at most `budget` candidate placements.
///
/// Only malformed input is an error. Hours or exams that do not fit are
/// returned as shortfalls next to the best partial schedule.
pub fn generate_with_budget(
    input: &GenerationInput,
    budget: Option<u64>,
) -> Result<GenerationOutput, InputError> {
    let start_time = Instant::now();
    validate_input(input)?;

    let settings = &input.settings;
    info!(
        "Generating timetable for {} classes and {} teachers over {} weeks (exams {})...",
        input.classes.len(),
        input.teachers.len(),
        settings.number_of_weeks,
        if settings.exam_scheduling_enabled { "on" } else { "off" }
    );

    let plan = distribution::plan(&input.classes, settings.number_of_weeks)?;
    trace!("Distribution plan: {plan:?}");

    let state = RunState::new(SearchBudget::new(budget));
    let state = BlockAllocator::new(
        &input.teachers,
        &plan,
        settings.exam_scheduling_enabled,
        state,
    )
    .run(&input.classes);
    let output = state.into_output();

    for violation in audit::audit(&output.entries) {
        warn!("Audit: {violation}");
    }

    let exams = output.entries.iter().filter(|e| e.is_exam).count();
    info!(
        "Placed {} sessions and {} exams with {} shortfalls in {:.2?}",
        output.entries.len() - exams,
        exams,
        output.shortfalls.len(),
        start_time.elapsed()
    );
    Ok(output)
}

/// Rejects input the engine cannot work with, reporting every problem at once.
pub fn validate_input(input: &GenerationInput) -> Result<(), InputError> {
    let mut errors = Vec::new();

    if input.settings.number_of_weeks < 1 {
        errors.push(InputError::InvalidWeekCount(input.settings.number_of_weeks));
    }

    let mut teacher_ids = HashSet::new();
    for teacher in &input.teachers {
        if !teacher_ids.insert(teacher.id.as_str()) {
            errors.push(InputError::DuplicateTeacherId(teacher.id.clone()));
        }
        for day in Day::ALL {
            for window in teacher.availability.on(day) {
                if window.start >= window.end {
                    errors.push(InputError::InvalidAvailability {
                        teacher_id: teacher.id.clone(),
                        day,
                        start: window.start,
                        end: window.end,
                    });
                }
            }
        }
    }

    let mut class_names = HashSet::new();
    let mut class_ids = HashSet::new();
    for class in &input.classes {
        if !class_names.insert(class.name.as_str()) {
            errors.push(InputError::DuplicateClassName(class.name.clone()));
        }
        // plans and exam progress are keyed by id
        if !class_ids.insert(class.id.as_str()) {
            errors.push(InputError::DuplicateClassId(class.id.clone()));
        }
        let mut subjects = HashSet::new();
        for req in &class.subject_requirements {
            if !subjects.insert(req.subject.as_str()) {
                errors.push(InputError::DuplicateSubject {
                    class_name: class.name.clone(),
                    subject: req.subject.clone(),
                });
            }
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(InputError::Multiple(errors)),
    }
}
