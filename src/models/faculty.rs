//! Faculty model.
//!
//! A faculty member teaches course sessions during declared availability
//! slots, subject to a weekly hour cap. Availability is a set of concrete
//! time slots; a session may only be assigned to a slot the faculty
//! member lists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Course, TimeSlot};

/// An instructor with availability and workload constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    /// Unique faculty identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Home department; used for qualification fallback.
    pub department: String,
    /// Contact address.
    #[serde(default)]
    pub email: String,
    /// Slots during which this faculty member may teach.
    #[serde(default)]
    pub availability: BTreeSet<TimeSlot>,
    /// Weekly teaching cap in hours.
    pub max_hours_per_week: u32,
    /// Preferred subset of `availability`. Empty means no preference.
    #[serde(default)]
    pub preferred_times: BTreeSet<TimeSlot>,
    /// Courses this faculty member is qualified to teach. `None` means
    /// qualified for every course in the home department.
    #[serde(default)]
    pub qualified_courses: Option<BTreeSet<String>>,
}

impl Faculty {
    /// Creates a faculty member with a 20-hour weekly cap and no
    /// availability.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: String::new(),
            email: String::new(),
            availability: BTreeSet::new(),
            max_hours_per_week: 20,
            preferred_times: BTreeSet::new(),
            qualified_courses: None,
        }
    }

    /// Sets the home department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Sets the contact address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Adds an availability slot.
    pub fn with_availability(mut self, slot: TimeSlot) -> Self {
        self.availability.insert(slot);
        self
    }

    /// Sets the weekly hour cap.
    pub fn with_max_hours(mut self, max_hours_per_week: u32) -> Self {
        self.max_hours_per_week = max_hours_per_week;
        self
    }

    /// Adds a preferred slot.
    pub fn with_preferred_time(mut self, slot: TimeSlot) -> Self {
        self.preferred_times.insert(slot);
        self
    }

    /// Restricts qualification to an explicit course-id set.
    pub fn with_qualified_courses(
        mut self,
        course_ids: impl IntoIterator<Item = String>,
    ) -> Self {
        self.qualified_courses = Some(course_ids.into_iter().collect());
        self
    }

    /// Whether this faculty member lists the slot as available.
    #[inline]
    pub fn is_available(&self, slot: &TimeSlot) -> bool {
        self.availability.contains(slot)
    }

    /// Whether this faculty member prefers the slot.
    #[inline]
    pub fn prefers(&self, slot: &TimeSlot) -> bool {
        self.preferred_times.contains(slot)
    }

    /// Whether scheduling the slot honors the time preference.
    ///
    /// Vacuously true when no preferred times are declared.
    pub fn time_preference_satisfied(&self, slot: &TimeSlot) -> bool {
        self.preferred_times.is_empty() || self.preferred_times.contains(slot)
    }

    /// Whether this faculty member may teach the course: either the
    /// course id is in the qualification set, or no set is declared and
    /// the departments match.
    pub fn can_teach(&self, course: &Course) -> bool {
        match &self.qualified_courses {
            Some(qualified) => qualified.contains(&course.id),
            None => self.department == course.department,
        }
    }

    /// Weekly teaching cap in minutes.
    #[inline]
    pub fn max_minutes_per_week(&self) -> u32 {
        self.max_hours_per_week * 60
    }
}
