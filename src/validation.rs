//! Input validation for timetabling problems.
//!
//! Checks structural integrity of courses, faculty, and classrooms
//! before solving. Detects:
//! - Duplicate IDs
//! - Malformed time slots (end ≤ start)
//! - Zero capacities, credits, durations, or session counts
//! - Dangling qualification references
//! - Preferred times outside declared availability
//!
//! All detected issues are accumulated and reported together; nothing
//! short-circuits on the first error.

use std::collections::HashSet;

use crate::models::Entities;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A time slot has end ≤ start.
    InvalidTimeSlot,
    /// A classroom has zero capacity.
    InvalidCapacity,
    /// A course has zero credits, duration, or sessions per week.
    InvalidCourse,
    /// A faculty member has a zero weekly hour cap.
    InvalidFaculty,
    /// A qualification references a course that doesn't exist.
    UnknownReference,
    /// A preferred time is not among the declared availability.
    PreferredTimeUnavailable,
    /// The request configuration is out of range.
    InvalidConfig,
}

impl ValidationErrorKind {
    /// Stable slug used in the boundary `invalid_input:<detail>` error.
    pub fn slug(self) -> &'static str {
        match self {
            ValidationErrorKind::DuplicateId => "duplicate_id",
            ValidationErrorKind::InvalidTimeSlot => "invalid_time_slot",
            ValidationErrorKind::InvalidCapacity => "invalid_capacity",
            ValidationErrorKind::InvalidCourse => "invalid_course",
            ValidationErrorKind::InvalidFaculty => "invalid_faculty",
            ValidationErrorKind::UnknownReference => "unknown_reference",
            ValidationErrorKind::PreferredTimeUnavailable => "preferred_time_unavailable",
            ValidationErrorKind::InvalidConfig => "invalid_config",
        }
    }
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the entity collections of a generation request.
///
/// Checks:
/// 1. No duplicate course, faculty, or classroom IDs
/// 2. All time slots (grid, availability, preferred) have start < end
/// 3. Classroom capacities are positive
/// 4. Course credits, durations, and session counts are positive
/// 5. Faculty weekly hour caps are positive
/// 6. `qualified_courses` entries reference existing courses
/// 7. `preferred_times` are a subset of `availability`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_entities(entities: &Entities) -> ValidationResult {
    let mut errors = Vec::new();

    let mut course_ids = HashSet::new();
    for course in &entities.courses {
        if !course_ids.insert(course.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", course.id),
            ));
        }
        if course.credits == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCourse,
                format!("Course '{}' has zero credits", course.id),
            ));
        }
        if course.duration_minutes == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCourse,
                format!("Course '{}' has zero duration", course.id),
            ));
        }
        if course.sessions_per_week == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCourse,
                format!("Course '{}' has zero sessions per week", course.id),
            ));
        }
    }

    let mut faculty_ids = HashSet::new();
    for faculty in &entities.faculty {
        if !faculty_ids.insert(faculty.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate faculty ID: {}", faculty.id),
            ));
        }
        if faculty.max_hours_per_week == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidFaculty,
                format!("Faculty '{}' has a zero weekly hour cap", faculty.id),
            ));
        }
        for slot in &faculty.availability {
            if !slot.is_well_formed() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTimeSlot,
                    format!(
                        "Faculty '{}' availability slot on {:?} has end <= start",
                        faculty.id, slot.day
                    ),
                ));
            }
        }
        for slot in &faculty.preferred_times {
            if !faculty.availability.contains(slot) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PreferredTimeUnavailable,
                    format!(
                        "Faculty '{}' prefers a slot on {:?} outside their availability",
                        faculty.id, slot.day
                    ),
                ));
            }
        }
        if let Some(qualified) = &faculty.qualified_courses {
            for course_id in qualified {
                if !course_ids.contains(course_id.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownReference,
                        format!(
                            "Faculty '{}' is qualified for unknown course '{}'",
                            faculty.id, course_id
                        ),
                    ));
                }
            }
        }
    }

    let mut classroom_ids = HashSet::new();
    for room in &entities.classrooms {
        if !classroom_ids.insert(room.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate classroom ID: {}", room.id),
            ));
        }
        if room.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Classroom '{}' has zero capacity", room.id),
            ));
        }
    }

    for slot in &entities.time_slots {
        if !slot.is_well_formed() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeSlot,
                format!("Grid slot on {:?} has end <= start", slot.day),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
