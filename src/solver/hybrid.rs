//! Hybrid orchestration: CSP first, greedy fallback.
//!
//! The backtracking solver gets half the remaining time budget. A
//! complete CSP solution is returned as-is; otherwise the greedy pass
//! runs with the full deadline and the better of the two schedules —
//! by optimization score, then conflict count, then assignment
//! fingerprint — is selected.

use std::cmp::Ordering;
use std::time::Instant;

use log::{debug, info};

use crate::domain::DomainTable;
use crate::models::Entities;
use crate::score;
use crate::solver::{
    assemble_schedule, CspOutcome, CspSolver, GreedySolver, SolveOutcome, SolverType,
};

/// Runs the hybrid strategy.
pub fn solve(table: &DomainTable, entities: &Entities, deadline: Instant) -> SolveOutcome {
    let now = Instant::now();
    let csp_deadline = now + deadline.saturating_duration_since(now) / 2;

    let (csp_outcome, stats) = CspSolver::new(table, entities, csp_deadline).solve();

    let (csp_assignment, csp_timed_out) = match csp_outcome {
        CspOutcome::Complete(assignment) => {
            return SolveOutcome {
                schedule: assemble_schedule(table, entities, &assignment),
                solver_used: SolverType::Csp,
                timed_out: false,
                stats,
            };
        }
        CspOutcome::Partial {
            assignment,
            timed_out,
        } => (assignment, timed_out),
        CspOutcome::Infeasible { .. } => (vec![None; table.variables.len()], false),
    };

    debug!("csp attempt incomplete (timed_out: {csp_timed_out}), running greedy fallback");
    let (greedy_assignment, greedy_timed_out) =
        GreedySolver::new(table, entities, deadline).solve();

    let csp_schedule = assemble_schedule(table, entities, &csp_assignment);
    let greedy_schedule = assemble_schedule(table, entities, &greedy_assignment);

    // On a perfect tie the two assignments are identical; keep the CSP
    // attribution.
    let csp_wins = score::compare(&csp_schedule, &greedy_schedule) != Ordering::Less;
    let (schedule, solver_used) = if csp_wins {
        (csp_schedule, SolverType::Csp)
    } else {
        (greedy_schedule, SolverType::Greedy)
    };
    info!(
        "hybrid selected {:?} schedule ({} scheduled, {} unscheduled)",
        solver_used, schedule.summary.total_sessions_scheduled, schedule.summary.unscheduled
    );

    SolveOutcome {
        schedule,
        solver_used,
        timed_out: csp_timed_out || greedy_timed_out,
        stats,
    }
}
