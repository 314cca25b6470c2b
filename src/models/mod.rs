//! Timetabling domain models.
//!
//! Provides the core data types for describing a weekly timetabling
//! problem and its solution. Entities are constructed once from boundary
//! input, stay immutable during a solve, and are discarded with the
//! result.
//!
//! | Type | Role |
//! |------|------|
//! | [`Course`] | Taught subject with weekly session demand |
//! | [`Faculty`] | Instructor with availability and hour cap |
//! | [`Classroom`] | Room with capacity, type, equipment |
//! | [`TimeSlot`] | One teaching period in the weekly grid |
//! | [`SessionRequirement`] | One weekly occurrence of a course |
//! | [`Schedule`] | Assignment of sessions to (slot, room, faculty) |

mod classroom;
mod course;
mod faculty;
mod schedule;
mod time_slot;

pub use classroom::{Classroom, RoomType};
pub use course::{Course, CourseType, SessionRequirement};
pub use faculty::Faculty;
pub use schedule::{Schedule, ScheduleEntry, ScheduleSummary};
pub use time_slot::{format_hhmm, parse_hhmm, DayOfWeek, TimeSlot};

use serde::{Deserialize, Serialize};

/// The input entity collections for one generation request.
///
/// `time_slots` is the canonical weekly grid. When empty, the grid is
/// derived as the union of all faculty availabilities, which is also
/// where candidate slots are drawn from (an assignment always requires
/// the slot to be in the assigned faculty member's availability).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entities {
    /// Courses to timetable.
    pub courses: Vec<Course>,
    /// Available instructors.
    pub faculty: Vec<Faculty>,
    /// Available rooms.
    pub classrooms: Vec<Classroom>,
    /// Canonical weekly slot grid; empty means derive from availability.
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl Entities {
    /// The canonical slot grid: the explicit `time_slots` collection if
    /// non-empty, otherwise the union of faculty availabilities.
    /// De-duplicated and sorted into weekly-grid order either way.
    pub fn canonical_slots(&self) -> Vec<TimeSlot> {
        let mut slots: Vec<TimeSlot> = if self.time_slots.is_empty() {
            self.faculty
                .iter()
                .flat_map(|f| f.availability.iter().copied())
                .collect()
        } else {
            self.time_slots.clone()
        };
        slots.sort();
        slots.dedup();
        slots
    }

    /// Looks up a course by id.
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Looks up a faculty member by id.
    pub fn faculty_member(&self, id: &str) -> Option<&Faculty> {
        self.faculty.iter().find(|f| f.id == id)
    }

    /// Looks up a classroom by id.
    pub fn classroom(&self, id: &str) -> Option<&Classroom> {
        self.classrooms.iter().find(|r| r.id == id)
    }

    /// Total session requirements across all courses.
    pub fn total_requirements(&self) -> usize {
        self.courses
            .iter()
            .map(|c| c.sessions_per_week as usize)
            .sum()
    }
}
