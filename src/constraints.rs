//! Constraint checking for partial and complete schedules.
//!
//! Exposes the pairwise compatibility predicate used during search, the
//! `admits` test a solver runs before committing a candidate entry, and
//! the full `violations` sweep the output validator and analyzer share.

use itertools::Itertools;

use crate::models::{Entities, Schedule, ScheduleEntry};

/// A detected constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Which rule was broken.
    pub kind: ViolationKind,
    /// The entity the violation is attributed to.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// A faculty member teaches two overlapping sessions.
    FacultyDoubleBooked,
    /// A classroom hosts two overlapping sessions.
    RoomDoubleBooked,
    /// The same session requirement appears in two entries.
    DuplicateSession,
    /// An entry's slot is outside the faculty member's availability.
    FacultyUnavailable,
    /// Enrollment exceeds the room's capacity.
    CapacityExceeded,
    /// The room lacks required equipment.
    MissingEquipment,
    /// The room type can't host the course type.
    RoomTypeMismatch,
    /// A faculty member's weekly minutes exceed their cap.
    WeeklyHoursExceeded,
    /// An entry references an unknown course, faculty member, or room.
    UnknownEntity,
}

impl Violation {
    fn new(kind: ViolationKind, entity_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

/// Whether two entries can coexist: they must be distinct sessions, and
/// overlapping slots must not share a faculty member or a classroom.
pub fn compatible(a: &ScheduleEntry, b: &ScheduleEntry) -> bool {
    if a.session_requirement == b.session_requirement {
        return false;
    }
    if a.time_slot.overlaps(&b.time_slot)
        && (a.faculty_id == b.faculty_id || a.classroom_id == b.classroom_id)
    {
        return false;
    }
    true
}

/// Whether a candidate entry can join the committed entries: pairwise
/// compatible with every one of them, and within the assigned faculty
/// member's weekly minute budget.
pub fn admits(entries: &[ScheduleEntry], candidate: &ScheduleEntry, entities: &Entities) -> bool {
    if !entries.iter().all(|e| compatible(e, candidate)) {
        return false;
    }
    let Some(faculty) = entities.faculty_member(&candidate.faculty_id) else {
        return false;
    };
    let committed: u32 = entries
        .iter()
        .filter(|e| e.faculty_id == candidate.faculty_id)
        .map(|e| e.time_slot.duration_minutes())
        .sum();
    committed + candidate.time_slot.duration_minutes() <= faculty.max_minutes_per_week()
}

/// Number of conflicting entry pairs: overlapping slots sharing a
/// faculty member or a classroom, or duplicated sessions.
pub fn conflict_pairs(entries: &[ScheduleEntry]) -> usize {
    entries
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| !compatible(a, b))
        .count()
}

/// Sweeps a schedule for every violation of the hard scheduling rules.
///
/// Used by the output validator (any result here is an engine bug) and
/// by tests constructing deliberately broken schedules.
pub fn violations(schedule: &Schedule, entities: &Entities) -> Vec<Violation> {
    let mut found = Vec::new();

    for (a, b) in schedule.entries.iter().tuple_combinations() {
        if a.session_requirement == b.session_requirement {
            found.push(Violation::new(
                ViolationKind::DuplicateSession,
                &a.course_id,
                format!(
                    "Session {} of course '{}' is scheduled more than once",
                    a.session_index(),
                    a.course_id
                ),
            ));
        }
        if a.time_slot.overlaps(&b.time_slot) {
            if a.faculty_id == b.faculty_id {
                found.push(Violation::new(
                    ViolationKind::FacultyDoubleBooked,
                    &a.faculty_id,
                    format!(
                        "Faculty '{}' teaches '{}' and '{}' in overlapping slots",
                        a.faculty_id, a.course_id, b.course_id
                    ),
                ));
            }
            if a.classroom_id == b.classroom_id {
                found.push(Violation::new(
                    ViolationKind::RoomDoubleBooked,
                    &a.classroom_id,
                    format!(
                        "Classroom '{}' hosts '{}' and '{}' in overlapping slots",
                        a.classroom_id, a.course_id, b.course_id
                    ),
                ));
            }
        }
    }

    for entry in &schedule.entries {
        let course = entities.course(&entry.course_id);
        let faculty = entities.faculty_member(&entry.faculty_id);
        let room = entities.classroom(&entry.classroom_id);

        let (Some(course), Some(faculty), Some(room)) = (course, faculty, room) else {
            found.push(Violation::new(
                ViolationKind::UnknownEntity,
                &entry.course_id,
                format!(
                    "Entry for course '{}' references an unknown entity",
                    entry.course_id
                ),
            ));
            continue;
        };

        if !faculty.is_available(&entry.time_slot) {
            found.push(Violation::new(
                ViolationKind::FacultyUnavailable,
                &faculty.id,
                format!(
                    "Faculty '{}' is not available for a scheduled slot of '{}'",
                    faculty.id, course.id
                ),
            ));
        }
        if !room.can_accommodate(course.enrolled_count) {
            found.push(Violation::new(
                ViolationKind::CapacityExceeded,
                &room.id,
                format!(
                    "Classroom '{}' seats {} but course '{}' enrolls {}",
                    room.id, room.capacity, course.id, course.enrolled_count
                ),
            ));
        }
        if !room.has_equipment(&course.required_equipment) {
            found.push(Violation::new(
                ViolationKind::MissingEquipment,
                &room.id,
                format!(
                    "Classroom '{}' lacks equipment required by course '{}'",
                    room.id, course.id
                ),
            ));
        }
        if !course.course_type.admits_room(room.room_type) {
            found.push(Violation::new(
                ViolationKind::RoomTypeMismatch,
                &room.id,
                format!(
                    "Classroom '{}' ({:?}) can't host course '{}' ({:?})",
                    room.id, room.room_type, course.id, course.course_type
                ),
            ));
        }
    }

    for faculty in &entities.faculty {
        let minutes = schedule.faculty_minutes(&faculty.id);
        if minutes > faculty.max_minutes_per_week() {
            found.push(Violation::new(
                ViolationKind::WeeklyHoursExceeded,
                &faculty.id,
                format!(
                    "Faculty '{}' is assigned {} minutes against a cap of {}",
                    faculty.id,
                    minutes,
                    faculty.max_minutes_per_week()
                ),
            ));
        }
    }

    found
}
