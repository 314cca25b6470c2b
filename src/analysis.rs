//! Conflict-graph analysis of a completed schedule.
//!
//! Builds an undirected graph whose nodes are schedule entries and
//! whose edges connect entries with overlapping slots sharing a faculty
//! member or classroom (empty for any valid schedule), then reports
//! structural metrics and threshold-triggered improvement suggestions.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::models::{Entities, Schedule, ScheduleEntry};

/// Suggestion emitted when the schedule has conflict edges.
pub const SUGGEST_RESOLVE_CONFLICTS: &str = "resolve schedule conflicts before publishing";
/// Suggestion emitted when room utilization drops below 40%.
pub const SUGGEST_UNDERUTILIZED_ROOMS: &str =
    "underutilized rooms: consolidate sessions into fewer rooms";
/// Suggestion emitted when a faculty member passes 80% of their cap.
pub const SUGGEST_BALANCE_FACULTY_LOAD: &str =
    "balance faculty load: some instructors are near their weekly limit";
/// Suggestion emitted when a course repeatedly misses its preferred days.
pub const SUGGEST_REVISIT_DAY_PREFERENCES: &str =
    "revisit day preferences: courses repeatedly land outside their preferred days";

/// Undirected conflict graph over schedule entries.
///
/// An edge `(a, b)` means the two entries overlap in time and share a
/// faculty member or a classroom.
#[derive(Debug, Clone)]
pub struct ConflictGraph {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl ConflictGraph {
    /// Builds the graph from a slice of entries.
    pub fn build(entries: &[ScheduleEntry]) -> Self {
        let mut adjacency = vec![Vec::new(); entries.len()];
        let mut edge_count = 0;
        for ((i, a), (j, b)) in entries.iter().enumerate().tuple_combinations() {
            let conflicting = a.time_slot.overlaps(&b.time_slot)
                && (a.faculty_id == b.faculty_id || a.classroom_id == b.classroom_id);
            if conflicting {
                adjacency[i].push(j);
                adjacency[j].push(i);
                edge_count += 1;
            }
        }
        Self {
            adjacency,
            edge_count,
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of conflict edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Degree of one node.
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Grows a clique greedily from the highest-degree node, visiting
    /// the rest in degree order and stopping at `bound` members. The
    /// clique size is a lower bound on the graph's chromatic number.
    pub fn greedy_clique(&self, bound: usize) -> Vec<usize> {
        if self.adjacency.is_empty() || bound == 0 {
            return Vec::new();
        }

        let mut order: Vec<usize> = (0..self.adjacency.len()).collect();
        order.sort_by(|&a, &b| self.degree(b).cmp(&self.degree(a)).then(a.cmp(&b)));

        let mut clique = vec![order[0]];
        for &node in &order[1..] {
            if clique.len() >= bound {
                break;
            }
            if clique.iter().all(|&member| self.adjacency[member].contains(&node)) {
                clique.push(node);
            }
        }
        clique
    }
}

/// Structural report over a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleAnalysis {
    /// Conflict edges among the entries (0 for valid output).
    pub total_conflicts: usize,
    /// Fraction of (room, grid slot) pairs occupied.
    pub room_utilization: f64,
    /// Assigned minutes per faculty id.
    pub faculty_load: BTreeMap<String, u32>,
    /// Size of the clique found in the conflict graph.
    pub chromatic_lower_bound: usize,
    /// Threshold-triggered improvement suggestions, in catalog order.
    pub suggestions: Vec<String>,
}

/// Clique search stops at this size to keep the scan linear.
const CLIQUE_BOUND: usize = 6;

/// Threshold below which rooms count as underutilized.
const LOW_UTILIZATION: f64 = 0.4;

/// Analyzes a schedule against its entity set.
pub fn analyze(schedule: &Schedule, entities: &Entities) -> ScheduleAnalysis {
    let graph = ConflictGraph::build(&schedule.entries);
    let total_conflicts = graph.edge_count();
    let chromatic_lower_bound = graph.greedy_clique(CLIQUE_BOUND).len();

    let room_utilization = room_utilization(schedule, entities);

    let mut faculty_load: BTreeMap<String, u32> = entities
        .faculty
        .iter()
        .map(|f| (f.id.clone(), 0))
        .collect();
    for entry in &schedule.entries {
        *faculty_load.entry(entry.faculty_id.clone()).or_insert(0) +=
            entry.time_slot.duration_minutes();
    }

    let overloaded = entities.faculty.iter().any(|f| {
        let load = faculty_load.get(&f.id).copied().unwrap_or(0);
        f64::from(load) > 0.8 * f64::from(f.max_minutes_per_week())
    });

    let day_preference_misses = repeated_day_misses(schedule, entities);

    let mut suggestions = Vec::new();
    if total_conflicts > 0 {
        suggestions.push(SUGGEST_RESOLVE_CONFLICTS.to_string());
    }
    if room_utilization < LOW_UTILIZATION {
        suggestions.push(SUGGEST_UNDERUTILIZED_ROOMS.to_string());
    }
    if overloaded {
        suggestions.push(SUGGEST_BALANCE_FACULTY_LOAD.to_string());
    }
    if day_preference_misses {
        suggestions.push(SUGGEST_REVISIT_DAY_PREFERENCES.to_string());
    }

    ScheduleAnalysis {
        total_conflicts,
        room_utilization,
        faculty_load,
        chromatic_lower_bound,
        suggestions,
    }
}

/// Fraction of the (classroom × grid slot) product that is occupied.
fn room_utilization(schedule: &Schedule, entities: &Entities) -> f64 {
    let slots = entities.canonical_slots();
    let cells = entities.classrooms.len() * slots.len();
    if cells == 0 {
        return 0.0;
    }
    let occupied: BTreeSet<(&str, &crate::models::TimeSlot)> = schedule
        .entries
        .iter()
        .map(|e| (e.classroom_id.as_str(), &e.time_slot))
        .collect();
    occupied.len() as f64 / cells as f64
}

/// Whether any course has two or more sessions on non-preferred days.
fn repeated_day_misses(schedule: &Schedule, entities: &Entities) -> bool {
    let mut misses: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in &schedule.entries {
        let Some(course) = entities.course(&entry.course_id) else {
            continue;
        };
        let declared = course
            .preferred_days
            .as_ref()
            .is_some_and(|days| !days.is_empty());
        if declared && !course.prefers_day(entry.time_slot.day) {
            *misses.entry(course.id.as_str()).or_insert(0) += 1;
        }
    }
    misses.values().any(|&count| count >= 2)
}
