//! Course model.
//!
//! A course describes one taught subject together with its weekly session
//! demand and room requirements. A course with `sessions_per_week = n`
//! expands into `n` indistinguishable [`SessionRequirement`]s, each of
//! which the solver assigns to one (time slot, classroom, faculty) triple.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{classroom::RoomType, DayOfWeek};

/// Course delivery format.
///
/// Determines which room types may host a session (see
/// [`CourseType::admits_room`]) and the greedy scheduling priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseType {
    Lecture,
    Lab,
    Tutorial,
    Seminar,
}

impl CourseType {
    /// Fixed greedy priority rank: Lab > Lecture > Seminar > Tutorial.
    ///
    /// Lower rank is scheduled earlier. Labs go first because they have
    /// the fewest compatible rooms.
    #[inline]
    pub fn scheduling_rank(self) -> u8 {
        match self {
            CourseType::Lab => 0,
            CourseType::Lecture => 1,
            CourseType::Seminar => 2,
            CourseType::Tutorial => 3,
        }
    }

    /// Whether a session of this type may be held in a room of the
    /// given type.
    ///
    /// Labs require lab rooms; lectures accept lecture halls and
    /// auditoriums; tutorials and seminars also fall back to lecture rooms.
    pub fn admits_room(self, room: RoomType) -> bool {
        match self {
            CourseType::Lab => room == RoomType::Lab,
            CourseType::Lecture => matches!(room, RoomType::Lecture | RoomType::Auditorium),
            CourseType::Tutorial => matches!(room, RoomType::Tutorial | RoomType::Lecture),
            CourseType::Seminar => matches!(room, RoomType::Seminar | RoomType::Lecture),
        }
    }
}

/// A course to be timetabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Course code (e.g. "CS101").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Owning department; used for faculty qualification fallback.
    pub department: String,
    /// Semester label (e.g. "Fall 2024").
    #[serde(default)]
    pub semester: String,
    /// Credit weight (≥ 1); higher credits schedule earlier in greedy mode.
    pub credits: u32,
    /// Number of enrolled students.
    pub enrolled_count: u32,
    /// Delivery format.
    pub course_type: CourseType,
    /// Length of one session in minutes.
    pub duration_minutes: u32,
    /// Weekly sessions to schedule (≥ 1).
    pub sessions_per_week: u32,
    /// Equipment every hosting room must provide.
    #[serde(default)]
    pub required_equipment: BTreeSet<String>,
    /// Days this course prefers; `None` means no preference.
    #[serde(default)]
    pub preferred_days: Option<BTreeSet<DayOfWeek>>,
    /// Student batches attending this course. Consumed only by the
    /// `selected_batches` projection; batches never act as a conflict
    /// resource.
    #[serde(default)]
    pub assigned_batches: BTreeSet<String>,
}

impl Course {
    /// Creates a lecture course with one 60-minute weekly session.
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: String::new(),
            department: String::new(),
            semester: String::new(),
            credits: 1,
            enrolled_count: 0,
            course_type: CourseType::Lecture,
            duration_minutes: 60,
            sessions_per_week: 1,
            required_equipment: BTreeSet::new(),
            preferred_days: None,
            assigned_batches: BTreeSet::new(),
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the owning department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Sets the semester label.
    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = semester.into();
        self
    }

    /// Sets the credit weight.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the enrolled student count.
    pub fn with_enrolled(mut self, enrolled_count: u32) -> Self {
        self.enrolled_count = enrolled_count;
        self
    }

    /// Sets the delivery format.
    pub fn with_course_type(mut self, course_type: CourseType) -> Self {
        self.course_type = course_type;
        self
    }

    /// Sets the session length in minutes.
    pub fn with_duration(mut self, duration_minutes: u32) -> Self {
        self.duration_minutes = duration_minutes;
        self
    }

    /// Sets the weekly session count.
    pub fn with_sessions_per_week(mut self, sessions_per_week: u32) -> Self {
        self.sessions_per_week = sessions_per_week;
        self
    }

    /// Adds a required equipment item.
    pub fn with_equipment(mut self, item: impl Into<String>) -> Self {
        self.required_equipment.insert(item.into());
        self
    }

    /// Sets the preferred days.
    pub fn with_preferred_days(mut self, days: impl IntoIterator<Item = DayOfWeek>) -> Self {
        self.preferred_days = Some(days.into_iter().collect());
        self
    }

    /// Adds an attending batch.
    pub fn with_batch(mut self, batch_id: impl Into<String>) -> Self {
        self.assigned_batches.insert(batch_id.into());
        self
    }

    /// Whether the given day is one of the declared preferred days.
    ///
    /// Returns `false` when no preference is declared; use
    /// [`Course::day_preference_satisfied`] for the vacuously-favorable
    /// reading.
    pub fn prefers_day(&self, day: DayOfWeek) -> bool {
        self.preferred_days
            .as_ref()
            .is_some_and(|days| days.contains(&day))
    }

    /// Whether scheduling on the given day honors the day preference.
    ///
    /// Vacuously true when the course declares no preferred days.
    pub fn day_preference_satisfied(&self, day: DayOfWeek) -> bool {
        match &self.preferred_days {
            None => true,
            Some(days) if days.is_empty() => true,
            Some(days) => days.contains(&day),
        }
    }
}

/// One weekly occurrence of a course that needs a slot.
///
/// `session_index` starts at 1 and stays stable across runs, keeping
/// solver output deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionRequirement {
    /// Owning course.
    pub course_id: String,
    /// 1-based index among the course's weekly sessions.
    pub session_index: u32,
}

impl SessionRequirement {
    /// Creates a session requirement.
    pub fn new(course_id: impl Into<String>, session_index: u32) -> Self {
        Self {
            course_id: course_id.into(),
            session_index,
        }
    }
}
