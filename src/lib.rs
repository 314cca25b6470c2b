//! Core scheduling engine for educational timetable generation.
//!
//! Takes a declarative description of courses, faculty, classrooms, and
//! time slots and produces a conflict-free weekly assignment of course
//! sessions to (time slot, room, instructor) triples.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Course`, `Faculty`, `Classroom`,
//!   `TimeSlot`, `SessionRequirement`, `Schedule`, `Entities`
//! - **`validation`**: Input integrity checks (duplicate IDs, malformed
//!   slots, zero capacities, dangling references)
//! - **`domain`**: Session expansion and feasible-candidate enumeration
//! - **`constraints`**: Pairwise compatibility, admission tests, and the
//!   full violation sweep
//! - **`solver`**: Backtracking CSP search (MRV, LCV, forward checking),
//!   greedy priority pass, and the hybrid driver
//! - **`score`**: Weighted schedule quality scoring
//! - **`analysis`**: Conflict-graph metrics and improvement suggestions
//! - **`engine`**: The `generate` entry point
//! - **`io`**: JSON boundary (request parsing, result emission)
//!
//! # Architecture
//!
//! Entities flow through domain generation into one of the solvers and
//! come back as a `Schedule`, which the validator re-checks before the
//! result leaves the engine. Everything is deterministic for a fixed
//! input and deadline: heuristics tie-break on stable entity
//! identifiers and no randomness is used anywhere.
//!
//! # References
//!
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern
//!   Approach", Ch. 6: Constraint Satisfaction Problems
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod analysis;
pub mod constraints;
pub mod domain;
pub mod engine;
pub mod io;
pub mod models;
pub mod score;
pub mod solver;
pub mod validation;
