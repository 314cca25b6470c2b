//! Domain generation: session expansion and candidate enumeration.
//!
//! Expands every course into its weekly session variables and
//! materializes, per variable, the feasible (time slot, classroom,
//! faculty) triples under the unary constraints: faculty qualification
//! and availability, room capacity, equipment, and type compatibility,
//! slot length versus course duration, and the weekly hour cap taken in
//! isolation.
//!
//! Candidates are pre-ranked by a static preference score so that both
//! solvers try the most desirable triples first. Ranking is stable with
//! ties broken by (day, start time, room id, faculty id) ascending,
//! which keeps solver output reproducible across runs.

use std::cmp::Reverse;

use crate::models::{Entities, TimeSlot};

/// One session variable: a `(course, session_index)` pair, with the
/// course given as an index into [`Entities::courses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionVar {
    /// Index of the owning course.
    pub course: usize,
    /// 1-based index among the course's weekly sessions.
    pub session_index: u32,
}

/// One feasible assignment for a session variable. All fields index
/// into the [`DomainTable`]'s slot grid and the entity collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Index into [`DomainTable::slots`].
    pub slot: usize,
    /// Index into [`Entities::classrooms`].
    pub room: usize,
    /// Index into [`Entities::faculty`].
    pub faculty: usize,
    /// Static preference score (higher is better).
    pub preference: i32,
}

/// The enumerated search space: variables, per-variable candidate
/// lists, and the slot grid with a precomputed overlap matrix.
#[derive(Debug, Clone)]
pub struct DomainTable {
    /// Canonical slot grid in weekly order.
    pub slots: Vec<TimeSlot>,
    /// Session variables in (course input order, session index) order.
    pub variables: Vec<SessionVar>,
    /// Pre-ranked candidates per variable, parallel to `variables`.
    pub domains: Vec<Vec<Candidate>>,
    /// Flattened `slots.len() × slots.len()` overlap matrix.
    overlap: Vec<bool>,
}

impl DomainTable {
    /// Enumerates variables and feasible candidates for an entity set.
    pub fn build(entities: &Entities) -> Self {
        let slots = entities.canonical_slots();
        let n_slots = slots.len();

        let mut overlap = vec![false; n_slots * n_slots];
        for i in 0..n_slots {
            for j in 0..n_slots {
                overlap[i * n_slots + j] = slots[i].overlaps(&slots[j]);
            }
        }

        // Enumeration follows the tie-break order: rooms and faculty by id.
        let mut room_order: Vec<usize> = (0..entities.classrooms.len()).collect();
        room_order.sort_by(|&a, &b| entities.classrooms[a].id.cmp(&entities.classrooms[b].id));
        let mut faculty_order: Vec<usize> = (0..entities.faculty.len()).collect();
        faculty_order.sort_by(|&a, &b| entities.faculty[a].id.cmp(&entities.faculty[b].id));

        let mut variables = Vec::new();
        let mut domains = Vec::new();
        for (course_idx, course) in entities.courses.iter().enumerate() {
            let mut candidates = Vec::new();
            for (slot_idx, slot) in slots.iter().enumerate() {
                if slot.duration_minutes() < course.duration_minutes {
                    continue;
                }
                for &room_idx in &room_order {
                    let room = &entities.classrooms[room_idx];
                    if !course.course_type.admits_room(room.room_type)
                        || !room.can_accommodate(course.enrolled_count)
                        || !room.has_equipment(&course.required_equipment)
                    {
                        continue;
                    }
                    for &faculty_idx in &faculty_order {
                        let faculty = &entities.faculty[faculty_idx];
                        if !faculty.can_teach(course)
                            || !faculty.is_available(slot)
                            || slot.duration_minutes() > faculty.max_minutes_per_week()
                        {
                            continue;
                        }

                        let mut preference = 0i32;
                        if faculty.prefers(slot) {
                            preference += 3;
                        }
                        if course.prefers_day(slot.day) {
                            preference += 2;
                        }
                        // Capacity slack bonus: room seats at least 1.2x enrollment.
                        if u64::from(room.capacity) * 10 >= u64::from(course.enrolled_count) * 12 {
                            preference += 1;
                        }
                        preference -= room
                            .equipment
                            .difference(&course.required_equipment)
                            .count() as i32;

                        candidates.push(Candidate {
                            slot: slot_idx,
                            room: room_idx,
                            faculty: faculty_idx,
                            preference,
                        });
                    }
                }
            }
            // Stable, so the enumeration order above breaks ties.
            candidates.sort_by_key(|c| Reverse(c.preference));

            for session_index in 1..=course.sessions_per_week {
                variables.push(SessionVar {
                    course: course_idx,
                    session_index,
                });
                domains.push(candidates.clone());
            }
        }

        Self {
            slots,
            variables,
            domains,
            overlap,
        }
    }

    /// Whether two grid slots overlap, by precomputed lookup.
    #[inline]
    pub fn slots_overlap(&self, a: usize, b: usize) -> bool {
        self.overlap[a * self.slots.len() + b]
    }

    /// Duration of a grid slot in minutes.
    #[inline]
    pub fn slot_duration(&self, slot: usize) -> u32 {
        self.slots[slot].duration_minutes()
    }

    /// Index of the first variable whose domain is empty, if any.
    ///
    /// Variables are in (course input order, session index) order, so
    /// this identifies the first unsatisfiable requirement.
    pub fn first_empty_domain(&self) -> Option<usize> {
        self.domains.iter().position(|domain| domain.is_empty())
    }
}
