//! Schedule (solution) model.
//!
//! A schedule is the assignment of course sessions to (time slot,
//! classroom, faculty) triples, together with a summary of how complete
//! and how good the assignment is.

use serde::{Deserialize, Serialize};

use super::{SessionRequirement, TimeSlot};

/// One scheduled session: a session requirement bound to a time slot,
/// a classroom, and a faculty member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// The weekly session this entry satisfies.
    pub session_requirement: SessionRequirement,
    /// Owning course (denormalized for query convenience).
    pub course_id: String,
    /// Assigned instructor.
    pub faculty_id: String,
    /// Assigned room.
    pub classroom_id: String,
    /// Assigned weekly slot.
    pub time_slot: TimeSlot,
}

impl ScheduleEntry {
    /// Creates an entry for session `session_index` of a course.
    pub fn new(
        course_id: impl Into<String>,
        session_index: u32,
        faculty_id: impl Into<String>,
        classroom_id: impl Into<String>,
        time_slot: TimeSlot,
    ) -> Self {
        let course_id = course_id.into();
        Self {
            session_requirement: SessionRequirement::new(course_id.clone(), session_index),
            course_id,
            faculty_id: faculty_id.into(),
            classroom_id: classroom_id.into(),
            time_slot,
        }
    }

    /// 1-based index of this session among its course's weekly sessions.
    #[inline]
    pub fn session_index(&self) -> u32 {
        self.session_requirement.session_index
    }
}

/// Summary statistics of a schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Sessions placed into the timetable.
    pub total_sessions_scheduled: usize,
    /// Sessions that could not be placed.
    pub unscheduled: usize,
    /// Weighted quality score in [0, 100].
    pub optimization_score: f64,
    /// Resource conflicts among the placed entries (0 for valid output).
    pub conflicts: usize,
}

/// A complete or partial weekly timetable.
///
/// Built incrementally by a solver, then frozen: the summary is filled
/// in once when the schedule is assembled and not maintained on edits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Scheduled entries, in stable (course, session) order.
    pub entries: Vec<ScheduleEntry>,
    /// Summary statistics.
    pub summary: ScheduleSummary,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Number of scheduled entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries taught by a faculty member.
    pub fn entries_for_faculty(&self, faculty_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.faculty_id == faculty_id)
            .collect()
    }

    /// All entries held in a classroom.
    pub fn entries_for_classroom(&self, classroom_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.classroom_id == classroom_id)
            .collect()
    }

    /// All entries of a course.
    pub fn entries_for_course(&self, course_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.course_id == course_id)
            .collect()
    }

    /// Minutes of teaching assigned to a faculty member.
    pub fn faculty_minutes(&self, faculty_id: &str) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.faculty_id == faculty_id)
            .map(|e| e.time_slot.duration_minutes())
            .sum()
    }
}
