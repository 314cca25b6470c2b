//! Priority-ordered greedy pass.
//!
//! Session variables are sorted by `(credits desc, enrollment desc,
//! course type rank, course id, session index)` and assigned one at a
//! time to the highest-ranked candidate still feasible against the
//! in-progress schedule. Sessions with no feasible candidate are left
//! unscheduled and the pass continues, so the solver never fails.
//!
//! Runtime is linear in the total candidate count. The deadline is
//! checked once per variable; on exhaustion the remaining sessions are
//! left unscheduled.

use std::time::Instant;

use log::debug;

use crate::domain::DomainTable;
use crate::models::Entities;
use crate::solver::Assignment;

/// Greedy solver over a prebuilt domain table.
pub struct GreedySolver<'a> {
    table: &'a DomainTable,
    entities: &'a Entities,
    deadline: Instant,
}

impl<'a> GreedySolver<'a> {
    /// Prepares a greedy pass over the given search space.
    pub fn new(table: &'a DomainTable, entities: &'a Entities, deadline: Instant) -> Self {
        Self {
            table,
            entities,
            deadline,
        }
    }

    /// Runs the pass. Returns the assignment and whether the deadline
    /// cut it short.
    pub fn solve(&self) -> (Assignment, bool) {
        let table = self.table;
        let mut assignment: Assignment = vec![None; table.variables.len()];
        let mut committed: Vec<(usize, usize, usize)> = Vec::new();
        let mut faculty_minutes = vec![0u32; self.entities.faculty.len()];
        let faculty_max: Vec<u32> = self
            .entities
            .faculty
            .iter()
            .map(|f| f.max_minutes_per_week())
            .collect();

        let mut timed_out = false;
        for &v in &self.priority_order() {
            if Instant::now() >= self.deadline {
                timed_out = true;
                break;
            }

            for (cand_idx, cand) in table.domains[v].iter().enumerate() {
                let duration = table.slot_duration(cand.slot);
                let over_budget = faculty_minutes[cand.faculty] + duration
                    > faculty_max[cand.faculty];
                let clashes = committed.iter().any(|&(slot, room, faculty)| {
                    table.slots_overlap(cand.slot, slot)
                        && (room == cand.room || faculty == cand.faculty)
                });
                if over_budget || clashes {
                    continue;
                }

                assignment[v] = Some(cand_idx);
                committed.push((cand.slot, cand.room, cand.faculty));
                faculty_minutes[cand.faculty] += duration;
                break;
            }

            if assignment[v].is_none() {
                let var = &table.variables[v];
                debug!(
                    "greedy: no feasible triple for session {} of course '{}'",
                    var.session_index, self.entities.courses[var.course].id
                );
            }
        }

        (assignment, timed_out)
    }

    /// Variable indices by scheduling priority: high-credit, large,
    /// room-constrained courses first, then stable entity order.
    fn priority_order(&self) -> Vec<usize> {
        let courses = &self.entities.courses;
        let variables = &self.table.variables;
        let mut order: Vec<usize> = (0..variables.len()).collect();
        order.sort_by(|&a, &b| {
            let ca = &courses[variables[a].course];
            let cb = &courses[variables[b].course];
            cb.credits
                .cmp(&ca.credits)
                .then_with(|| cb.enrolled_count.cmp(&ca.enrolled_count))
                .then_with(|| {
                    ca.course_type
                        .scheduling_rank()
                        .cmp(&cb.course_type.scheduling_rank())
                })
                .then_with(|| ca.id.cmp(&cb.id))
                .then_with(|| variables[a].session_index.cmp(&variables[b].session_index))
        });
        order
    }
}
