//! Timetable solvers.
//!
//! Three strategies behind one entry point:
//!
//! - **`csp`**: backtracking search with MRV variable ordering, LCV
//!   value ordering, and forward checking. Complete but may time out.
//! - **`greedy`**: priority-ordered single pass. Never fails, may leave
//!   sessions unscheduled.
//! - **`hybrid`**: CSP within a budget, greedy fallback, best of the
//!   two by optimization score.
//!
//! All solvers work on candidate indices into a prebuilt
//! [`DomainTable`] and are deterministic for a fixed input and deadline.

mod csp;
mod greedy;
mod hybrid;

pub use csp::{CspOutcome, CspSolver, SearchStats};
pub use greedy::GreedySolver;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::constraints;
use crate::domain::DomainTable;
use crate::models::{Entities, Schedule, ScheduleEntry, ScheduleSummary};
use crate::score;

/// Solving strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverType {
    /// Backtracking constraint search only.
    Csp,
    /// Priority-ordered greedy pass only.
    Greedy,
    /// CSP within a budget, greedy fallback.
    #[default]
    Hybrid,
}

/// A candidate index per session variable; `None` means unscheduled.
pub type Assignment = Vec<Option<usize>>;

/// Result of a solver run, ready for result assembly.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// The assembled schedule, summary included.
    pub schedule: Schedule,
    /// Which solver actually produced the schedule (never `Hybrid`).
    pub solver_used: SolverType,
    /// Whether any solver attempt hit the deadline.
    pub timed_out: bool,
    /// Backtracking search counters (zeroed for a pure greedy run).
    pub stats: SearchStats,
}

/// Solves the problem with the selected strategy.
///
/// The single dispatch point over the solver family; `deadline` is the
/// cooperative cancellation instant shared by all strategies.
pub fn solve(
    solver_type: SolverType,
    table: &DomainTable,
    entities: &Entities,
    deadline: Instant,
) -> SolveOutcome {
    match solver_type {
        SolverType::Csp => {
            let (outcome, stats) = CspSolver::new(table, entities, deadline).solve();
            let (assignment, timed_out) = match outcome {
                CspOutcome::Complete(assignment) => (assignment, false),
                CspOutcome::Partial {
                    assignment,
                    timed_out,
                } => (assignment, timed_out),
                CspOutcome::Infeasible { .. } => (vec![None; table.variables.len()], false),
            };
            SolveOutcome {
                schedule: assemble_schedule(table, entities, &assignment),
                solver_used: SolverType::Csp,
                timed_out,
                stats,
            }
        }
        SolverType::Greedy => {
            let (assignment, timed_out) = GreedySolver::new(table, entities, deadline).solve();
            SolveOutcome {
                schedule: assemble_schedule(table, entities, &assignment),
                solver_used: SolverType::Greedy,
                timed_out,
                stats: SearchStats::default(),
            }
        }
        SolverType::Hybrid => hybrid::solve(table, entities, deadline),
    }
}

/// Materializes an assignment into schedule entries.
///
/// Entries come out in variable order — (course input order, session
/// index) — which keeps result documents byte-stable across runs.
pub(crate) fn entries_from_assignment(
    table: &DomainTable,
    entities: &Entities,
    assignment: &[Option<usize>],
) -> Vec<ScheduleEntry> {
    let mut entries = Vec::new();
    for (var_idx, var) in table.variables.iter().enumerate() {
        if let Some(cand_idx) = assignment[var_idx] {
            let cand = &table.domains[var_idx][cand_idx];
            entries.push(ScheduleEntry::new(
                entities.courses[var.course].id.clone(),
                var.session_index,
                entities.faculty[cand.faculty].id.clone(),
                entities.classrooms[cand.room].id.clone(),
                table.slots[cand.slot],
            ));
        }
    }
    entries
}

/// Builds a [`Schedule`] with a fully populated summary from an
/// assignment.
pub fn assemble_schedule(
    table: &DomainTable,
    entities: &Entities,
    assignment: &[Option<usize>],
) -> Schedule {
    let entries = entries_from_assignment(table, entities, assignment);
    let scheduled = entries.len();
    let unscheduled = table.variables.len() - scheduled;
    let conflicts = constraints::conflict_pairs(&entries);
    let optimization_score = score::optimization_score(
        &entries,
        conflicts,
        unscheduled,
        table.variables.len(),
        entities,
    );

    Schedule {
        entries,
        summary: ScheduleSummary {
            total_sessions_scheduled: scheduled,
            unscheduled,
            optimization_score,
            conflicts,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classroom, Course, DayOfWeek, Faculty, RoomType, TimeSlot};
    use std::time::Duration;

    fn slot(day: DayOfWeek, start: &str, end: &str) -> TimeSlot {
        TimeSlot::from_hhmm(day, start, end).unwrap()
    }

    fn entities() -> Entities {
        Entities {
            courses: vec![Course::new("c1", "CS101")
                .with_department("CS")
                .with_enrolled(20)],
            faculty: vec![Faculty::new("f1", "A")
                .with_department("CS")
                .with_availability(slot(DayOfWeek::Monday, "09:00", "10:00"))],
            classrooms: vec![Classroom::new("r1", "LH-1", RoomType::Lecture).with_capacity(30)],
            ..Entities::default()
        }
    }

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(30)
    }

    #[test]
    fn test_solver_type_serde_names() {
        assert_eq!(serde_json::to_value(SolverType::Csp).unwrap(), "csp");
        assert_eq!(serde_json::to_value(SolverType::Greedy).unwrap(), "greedy");
        assert_eq!(serde_json::to_value(SolverType::Hybrid).unwrap(), "hybrid");
        assert_eq!(SolverType::default(), SolverType::Hybrid);
    }

    #[test]
    fn test_assemble_schedule_summary() {
        let e = entities();
        let table = DomainTable::build(&e);
        let assignment = vec![Some(0)];

        let schedule = assemble_schedule(&table, &e, &assignment);
        assert_eq!(schedule.summary.total_sessions_scheduled, 1);
        assert_eq!(schedule.summary.unscheduled, 0);
        assert_eq!(schedule.summary.conflicts, 0);
        assert!(schedule.summary.optimization_score > 90.0);
        assert_eq!(schedule.entries[0].course_id, "c1");
        assert_eq!(schedule.entries[0].faculty_id, "f1");
    }

    #[test]
    fn test_assemble_partial_assignment() {
        let mut e = entities();
        e.courses[0].sessions_per_week = 2;
        let table = DomainTable::build(&e);
        let assignment = vec![Some(0), None];

        let schedule = assemble_schedule(&table, &e, &assignment);
        assert_eq!(schedule.summary.total_sessions_scheduled, 1);
        assert_eq!(schedule.summary.unscheduled, 1);
    }

    #[test]
    fn test_dispatch_each_strategy() {
        let e = entities();
        let table = DomainTable::build(&e);

        for solver_type in [SolverType::Csp, SolverType::Greedy, SolverType::Hybrid] {
            let outcome = solve(solver_type, &table, &e, far_deadline());
            assert_eq!(outcome.schedule.len(), 1, "{solver_type:?}");
            assert!(!outcome.timed_out);
            assert_ne!(outcome.solver_used, SolverType::Hybrid);
        }
    }
}
