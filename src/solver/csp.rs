//! Backtracking constraint search.
//!
//! Session variables are assigned depth-first. Variable selection uses
//! MRV (fewest live candidates, ties broken by constraint degree
//! descending, then course id); value ordering uses LCV (fewest
//! eliminations from other live domains, ties broken by the static
//! preference ranking); every assignment is propagated by forward
//! checking with a removal trail so backtracking restores domains in
//! O(removals).
//!
//! The search carries a monotonic deadline, checked once per recursive
//! expansion. On exhaustion or deadline the best partial assignment
//! found so far is returned: most variables assigned, ties broken by
//! optimization score.

use std::time::Instant;

use log::debug;

use crate::domain::DomainTable;
use crate::models::Entities;
use crate::score;
use crate::solver::{entries_from_assignment, Assignment};

/// Search counters, reported through generation statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes expanded (recursive calls entered).
    pub nodes_explored: u64,
    /// Deepest assignment depth reached.
    pub max_depth: usize,
}

/// Result of a backtracking run.
#[derive(Debug, Clone)]
pub enum CspOutcome {
    /// Every session variable is assigned.
    Complete(Assignment),
    /// Search ended early; the best partial assignment found.
    Partial {
        assignment: Assignment,
        /// Whether the deadline (rather than exhaustion) ended the search.
        timed_out: bool,
    },
    /// A variable had no candidates before search began.
    Infeasible {
        /// Index of the first variable with an empty domain.
        variable: usize,
    },
}

enum Search {
    Found,
    Exhausted,
    DeadlineExceeded,
}

/// Backtracking CSP solver over a prebuilt domain table.
pub struct CspSolver<'a> {
    table: &'a DomainTable,
    entities: &'a Entities,
    deadline: Instant,

    assigned: Assignment,
    assigned_count: usize,
    /// Live flags per variable, parallel to the candidate lists.
    live: Vec<Vec<bool>>,
    live_count: Vec<usize>,
    /// Minutes committed per faculty index.
    faculty_minutes: Vec<u32>,
    faculty_max: Vec<u32>,
    /// Forward-checking removals as (variable, candidate) pairs.
    trail: Vec<(usize, usize)>,

    best: Option<BestPartial>,
    stats: SearchStats,
}

struct BestPartial {
    assignment: Assignment,
    count: usize,
    score: f64,
}

impl<'a> CspSolver<'a> {
    /// Prepares solver state over the given search space.
    pub fn new(table: &'a DomainTable, entities: &'a Entities, deadline: Instant) -> Self {
        let n = table.variables.len();
        Self {
            table,
            entities,
            deadline,
            assigned: vec![None; n],
            assigned_count: 0,
            live: table.domains.iter().map(|d| vec![true; d.len()]).collect(),
            live_count: table.domains.iter().map(Vec::len).collect(),
            faculty_minutes: vec![0; entities.faculty.len()],
            faculty_max: entities
                .faculty
                .iter()
                .map(|f| f.max_minutes_per_week())
                .collect(),
            trail: Vec::new(),
            best: None,
            stats: SearchStats::default(),
        }
    }

    /// Runs the search to completion, exhaustion, or deadline.
    pub fn solve(mut self) -> (CspOutcome, SearchStats) {
        if let Some(variable) = self.table.first_empty_domain() {
            return (CspOutcome::Infeasible { variable }, self.stats);
        }

        let result = self.backtrack(0);
        debug!(
            "csp search: {} nodes, max depth {}",
            self.stats.nodes_explored, self.stats.max_depth
        );

        let stats = self.stats;
        let outcome = match result {
            Search::Found => CspOutcome::Complete(self.assigned),
            Search::Exhausted => CspOutcome::Partial {
                assignment: self.take_best(),
                timed_out: false,
            },
            Search::DeadlineExceeded => CspOutcome::Partial {
                assignment: self.take_best(),
                timed_out: true,
            },
        };
        (outcome, stats)
    }

    fn take_best(&mut self) -> Assignment {
        match self.best.take() {
            Some(best) => best.assignment,
            None => vec![None; self.table.variables.len()],
        }
    }

    fn backtrack(&mut self, depth: usize) -> Search {
        if Instant::now() >= self.deadline {
            return Search::DeadlineExceeded;
        }
        self.stats.nodes_explored += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        if self.assigned_count == self.table.variables.len() {
            return Search::Found;
        }

        let variable = self.select_variable();
        if self.live_count[variable] == 0 {
            return Search::Exhausted;
        }

        for cand_idx in self.order_values(variable) {
            let mark = self.trail.len();
            self.assign(variable, cand_idx);
            self.note_partial();

            match self.backtrack(depth + 1) {
                Search::Found => return Search::Found,
                Search::DeadlineExceeded => return Search::DeadlineExceeded,
                Search::Exhausted => {}
            }

            self.unassign(variable, cand_idx, mark);
        }

        Search::Exhausted
    }

    /// MRV: the unassigned variable with the fewest live candidates.
    /// Ties go to the higher constraint degree, then the smaller
    /// (course id, session index).
    fn select_variable(&self) -> usize {
        let n = self.table.variables.len();
        let min_count = (0..n)
            .filter(|&v| self.assigned[v].is_none())
            .map(|v| self.live_count[v])
            .min()
            .expect("at least one unassigned variable");

        let tied: Vec<usize> = (0..n)
            .filter(|&v| self.assigned[v].is_none() && self.live_count[v] == min_count)
            .collect();
        if tied.len() == 1 {
            return tied[0];
        }

        tied.into_iter()
            .map(|v| (v, self.degree(v)))
            .min_by(|&(a, da), &(b, db)| {
                db.cmp(&da).then_with(|| self.variable_key(a).cmp(&self.variable_key(b)))
            })
            .expect("tied set is non-empty")
            .0
    }

    fn variable_key(&self, v: usize) -> (&str, u32) {
        let var = &self.table.variables[v];
        (
            self.entities.courses[var.course].id.as_str(),
            var.session_index,
        )
    }

    /// Constraint degree: how many other unassigned variables share a
    /// faculty member or room with this variable's live candidates.
    fn degree(&self, v: usize) -> usize {
        let table = self.table;
        let mut faculty_used = vec![false; self.entities.faculty.len()];
        let mut room_used = vec![false; self.entities.classrooms.len()];
        for (cand_idx, cand) in table.domains[v].iter().enumerate() {
            if self.live[v][cand_idx] {
                faculty_used[cand.faculty] = true;
                room_used[cand.room] = true;
            }
        }

        (0..table.variables.len())
            .filter(|&u| u != v && self.assigned[u].is_none())
            .filter(|&u| {
                table.domains[u]
                    .iter()
                    .enumerate()
                    .any(|(cand_idx, cand)| {
                        self.live[u][cand_idx]
                            && (faculty_used[cand.faculty] || room_used[cand.room])
                    })
            })
            .count()
    }

    /// LCV: live candidates ordered by how few values they eliminate
    /// from other live domains. Stable, so the static preference
    /// ranking decides ties.
    fn order_values(&self, v: usize) -> Vec<usize> {
        let live_candidates: Vec<usize> = (0..self.table.domains[v].len())
            .filter(|&cand_idx| self.live[v][cand_idx])
            .collect();
        let eliminations: Vec<usize> = live_candidates
            .iter()
            .map(|&cand_idx| self.eliminations(v, cand_idx))
            .collect();

        let mut order: Vec<usize> = (0..live_candidates.len()).collect();
        order.sort_by_key(|&i| eliminations[i]);
        order.into_iter().map(|i| live_candidates[i]).collect()
    }

    fn eliminations(&self, v: usize, cand_idx: usize) -> usize {
        let table = self.table;
        let cand = table.domains[v][cand_idx];
        let duration = table.slot_duration(cand.slot);
        let budget_after = self.faculty_minutes[cand.faculty] + duration;

        let mut eliminated = 0;
        for u in 0..table.variables.len() {
            if u == v || self.assigned[u].is_some() {
                continue;
            }
            for (other_idx, other) in table.domains[u].iter().enumerate() {
                if !self.live[u][other_idx] {
                    continue;
                }
                let resource_clash = table.slots_overlap(cand.slot, other.slot)
                    && (other.room == cand.room || other.faculty == cand.faculty);
                let budget_clash = other.faculty == cand.faculty
                    && budget_after + table.slot_duration(other.slot)
                        > self.faculty_max[cand.faculty];
                if resource_clash || budget_clash {
                    eliminated += 1;
                }
            }
        }
        eliminated
    }

    /// Commits a candidate and forward-checks every other unassigned
    /// variable, recording removals on the trail.
    fn assign(&mut self, v: usize, cand_idx: usize) {
        let table = self.table;
        let cand = table.domains[v][cand_idx];
        self.assigned[v] = Some(cand_idx);
        self.assigned_count += 1;
        self.faculty_minutes[cand.faculty] += table.slot_duration(cand.slot);

        for u in 0..table.variables.len() {
            if u == v || self.assigned[u].is_some() {
                continue;
            }
            for (other_idx, other) in table.domains[u].iter().enumerate() {
                if !self.live[u][other_idx] {
                    continue;
                }
                let resource_clash = table.slots_overlap(cand.slot, other.slot)
                    && (other.room == cand.room || other.faculty == cand.faculty);
                let budget_clash = other.faculty == cand.faculty
                    && self.faculty_minutes[cand.faculty] + table.slot_duration(other.slot)
                        > self.faculty_max[cand.faculty];
                if resource_clash || budget_clash {
                    self.live[u][other_idx] = false;
                    self.live_count[u] -= 1;
                    self.trail.push((u, other_idx));
                }
            }
        }
    }

    /// Reverts an assignment and every domain removal it caused.
    fn unassign(&mut self, v: usize, cand_idx: usize, mark: usize) {
        while self.trail.len() > mark {
            let (u, other_idx) = self.trail.pop().expect("trail entries above mark");
            self.live[u][other_idx] = true;
            self.live_count[u] += 1;
        }
        let cand = self.table.domains[v][cand_idx];
        self.faculty_minutes[cand.faculty] -= self.table.slot_duration(cand.slot);
        self.assigned[v] = None;
        self.assigned_count -= 1;
    }

    /// Tracks the best partial assignment: most variables assigned,
    /// ties broken by optimization score.
    fn note_partial(&mut self) {
        let count = self.assigned_count;
        let improves = match &self.best {
            None => true,
            Some(best) if count > best.count => true,
            Some(best) if count == best.count => self.current_score() > best.score,
            Some(_) => false,
        };
        if improves {
            let score = self.current_score();
            self.best = Some(BestPartial {
                assignment: self.assigned.clone(),
                count,
                score,
            });
        }
    }

    fn current_score(&self) -> f64 {
        let entries = entries_from_assignment(self.table, self.entities, &self.assigned);
        // Forward checking keeps partial assignments conflict-free.
        score::optimization_score(
            &entries,
            0,
            self.table.variables.len() - self.assigned_count,
            self.table.variables.len(),
            self.entities,
        )
    }
}
