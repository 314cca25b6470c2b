//! Generation engine: the primary entry point of the crate.
//!
//! [`generate`] validates the entity collections, projects them through
//! the configured selections, enumerates the search space, dispatches
//! the selected solver under a deadline, verifies the returned schedule
//! against every hard constraint, and packages the result with
//! statistics and optional conflict-graph analysis.
//!
//! The engine is pure with respect to the filesystem and keeps no state
//! between requests; independent generations may run in parallel.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::{self, ScheduleAnalysis};
use crate::constraints;
use crate::domain::DomainTable;
use crate::models::{Entities, Schedule};
use crate::solver::{self, SolverType};
use crate::validation;

/// Recognized options of a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Solving strategy.
    pub solver_type: SolverType,
    /// Time budget in seconds (must be positive).
    pub max_time_seconds: u64,
    /// Whether to run the conflict-graph analyzer on the result.
    pub optimize: bool,
    /// Course ids to keep; `None` keeps all.
    pub selected_courses: Option<BTreeSet<String>>,
    /// Faculty ids to keep; `None` keeps all.
    pub selected_faculty: Option<BTreeSet<String>>,
    /// Batch ids to keep (filters courses by attendance); `None` keeps all.
    pub selected_batches: Option<BTreeSet<String>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            solver_type: SolverType::Hybrid,
            max_time_seconds: 30,
            optimize: false,
            selected_courses: None,
            selected_faculty: None,
            selected_batches: None,
        }
    }
}

/// Statistics of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStatistics {
    /// The solver that produced the schedule (the configured strategy
    /// when generation failed before solving).
    pub solver_used: SolverType,
    /// Wall-clock time spent.
    pub generation_time_seconds: f64,
    /// Sessions placed.
    pub total_entries: usize,
    /// Sessions left unplaced.
    pub unscheduled: usize,
    /// Conflicts among placed sessions (0 for valid output).
    pub conflicts: usize,
    /// Weighted quality score in [0, 100].
    pub optimization_score: f64,
    /// Whether a solver attempt hit the deadline.
    pub timed_out: bool,
}

/// Outcome of a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Whether a schedule was produced.
    pub success: bool,
    /// The schedule, present iff `success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    /// Run statistics, always present.
    pub statistics: GenerationStatistics,
    /// Analyzer report, present iff requested and `success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ScheduleAnalysis>,
    /// Stable error slug, present iff `!success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    /// Builds a failed result with a stable error slug.
    pub fn failure(
        solver_type: SolverType,
        error: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: false,
            schedule: None,
            statistics: GenerationStatistics {
                solver_used: solver_type,
                generation_time_seconds: elapsed.as_secs_f64(),
                total_entries: 0,
                unscheduled: 0,
                conflicts: 0,
                optimization_score: 0.0,
                timed_out: false,
            },
            analysis: None,
            error: Some(error.into()),
        }
    }
}

/// Generates a timetable for the given configuration and entities.
///
/// Error slugs: `invalid_input:<detail>`, `no_courses_selected`,
/// `no_faculty_selected`, `empty_domain:<course_id>`, `internal`.
pub fn generate(config: &GenerationConfig, entities: &Entities) -> GenerationResult {
    let started = Instant::now();

    if config.max_time_seconds == 0 {
        warn!("rejected request with zero time budget");
        return GenerationResult::failure(
            config.solver_type,
            format!(
                "invalid_input:{}",
                validation::ValidationErrorKind::InvalidConfig.slug()
            ),
            started.elapsed(),
        );
    }

    if let Err(errors) = validation::validate_entities(entities) {
        warn!("input validation failed with {} errors", errors.len());
        for err in &errors {
            debug!("validation: {}", err.message);
        }
        return GenerationResult::failure(
            config.solver_type,
            format!("invalid_input:{}", errors[0].kind.slug()),
            started.elapsed(),
        );
    }

    let projected = project(config, entities);
    info!(
        "generating for {} courses, {} faculty, {} classrooms",
        projected.courses.len(),
        projected.faculty.len(),
        projected.classrooms.len()
    );

    if projected.courses.is_empty()
        && (config.selected_courses.is_some() || config.selected_batches.is_some())
    {
        return GenerationResult::failure(
            config.solver_type,
            "no_courses_selected",
            started.elapsed(),
        );
    }

    // An empty entity set with nothing selected solves trivially below;
    // missing faculty is only an error while courses need scheduling.
    if !projected.courses.is_empty() && projected.faculty.is_empty() {
        return GenerationResult::failure(
            config.solver_type,
            "no_faculty_selected",
            started.elapsed(),
        );
    }

    let table = DomainTable::build(&projected);
    if let Some(variable) = table.first_empty_domain() {
        let course_id = &projected.courses[table.variables[variable].course].id;
        warn!(
            "session {} of course '{}' has no feasible triple",
            table.variables[variable].session_index, course_id
        );
        return GenerationResult::failure(
            config.solver_type,
            format!("empty_domain:{course_id}"),
            started.elapsed(),
        );
    }

    let deadline = Instant::now() + Duration::from_secs(config.max_time_seconds);
    let outcome = solver::solve(config.solver_type, &table, &projected, deadline);
    debug!(
        "search explored {} nodes (max depth {})",
        outcome.stats.nodes_explored, outcome.stats.max_depth
    );

    let violations = constraints::violations(&outcome.schedule, &projected);
    if !violations.is_empty() {
        for violation in &violations {
            error!("invariant breach in solver output: {}", violation.message);
        }
        return GenerationResult::failure(config.solver_type, "internal", started.elapsed());
    }

    assemble_result(
        config,
        outcome.schedule,
        outcome.solver_used,
        outcome.timed_out,
        started,
        &projected,
    )
}

fn assemble_result(
    config: &GenerationConfig,
    schedule: Schedule,
    solver_used: SolverType,
    timed_out: bool,
    started: Instant,
    projected: &Entities,
) -> GenerationResult {
    let analysis = config
        .optimize
        .then(|| analysis::analyze(&schedule, projected));

    let statistics = GenerationStatistics {
        solver_used,
        generation_time_seconds: started.elapsed().as_secs_f64(),
        total_entries: schedule.summary.total_sessions_scheduled,
        unscheduled: schedule.summary.unscheduled,
        conflicts: schedule.summary.conflicts,
        optimization_score: schedule.summary.optimization_score,
        timed_out,
    };
    info!(
        "generated {} entries ({} unscheduled) with {:?}, score {:.1}",
        statistics.total_entries,
        statistics.unscheduled,
        solver_used,
        statistics.optimization_score
    );

    GenerationResult {
        success: true,
        schedule: Some(schedule),
        statistics,
        analysis,
        error: None,
    }
}

/// Projects the entity set through the configured selections. Batches
/// filter courses by attendance; they never join the conflict model.
fn project(config: &GenerationConfig, entities: &Entities) -> Entities {
    let courses = entities
        .courses
        .iter()
        .filter(|course| {
            config
                .selected_courses
                .as_ref()
                .is_none_or(|keep| keep.contains(&course.id))
                && config.selected_batches.as_ref().is_none_or(|keep| {
                    course.assigned_batches.iter().any(|b| keep.contains(b))
                })
        })
        .cloned()
        .collect();
    let faculty = entities
        .faculty
        .iter()
        .filter(|f| {
            config
                .selected_faculty
                .as_ref()
                .is_none_or(|keep| keep.contains(&f.id))
        })
        .cloned()
        .collect();

    Entities {
        courses,
        faculty,
        classrooms: entities.classrooms.clone(),
        time_slots: entities.time_slots.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classroom, Course, DayOfWeek, Faculty, RoomType, TimeSlot};

    fn slot(day: DayOfWeek, start: &str, end: &str) -> TimeSlot {
        TimeSlot::from_hhmm(day, start, end).unwrap()
    }

    fn singleton_entities() -> Entities {
        Entities {
            courses: vec![Course::new("c1", "CS101")
                .with_name("Intro to Computing")
                .with_department("CS")
                .with_enrolled(20)],
            faculty: vec![Faculty::new("f1", "Dr. Ahmed")
                .with_department("CS")
                .with_availability(slot(DayOfWeek::Monday, "09:00", "10:00"))],
            classrooms: vec![Classroom::new("r1", "LH-1", RoomType::Lecture).with_capacity(30)],
            ..Entities::default()
        }
    }

    fn config(solver_type: SolverType) -> GenerationConfig {
        GenerationConfig {
            solver_type,
            max_time_seconds: 10,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_trivial_singleton() {
        let result = generate(&config(SolverType::Hybrid), &singleton_entities());

        assert!(result.success, "error: {:?}", result.error);
        let schedule = result.schedule.unwrap();
        assert_eq!(schedule.len(), 1);
        let entry = &schedule.entries[0];
        assert_eq!(entry.course_id, "c1");
        assert_eq!(entry.faculty_id, "f1");
        assert_eq!(entry.classroom_id, "r1");
        assert_eq!(entry.time_slot, slot(DayOfWeek::Monday, "09:00", "10:00"));
        assert!(result.statistics.optimization_score >= 90.0);
        assert_eq!(result.statistics.conflicts, 0);
        assert!(!result.statistics.timed_out);
    }

    #[test]
    fn test_forced_contention_reports_unscheduled() {
        let mon9 = slot(DayOfWeek::Monday, "09:00", "10:00");
        let entities = Entities {
            courses: vec![
                Course::new("c1", "CS101").with_department("CS"),
                Course::new("c2", "CS102").with_department("CS"),
            ],
            faculty: vec![Faculty::new("f1", "A")
                .with_department("CS")
                .with_availability(mon9)],
            classrooms: vec![
                Classroom::new("r1", "LH-1", RoomType::Lecture).with_capacity(30),
                Classroom::new("r2", "LH-2", RoomType::Lecture).with_capacity(30),
            ],
            ..Entities::default()
        };

        for solver_type in [SolverType::Csp, SolverType::Greedy, SolverType::Hybrid] {
            let result = generate(&config(solver_type), &entities);
            assert!(result.success);
            assert_eq!(result.statistics.total_entries, 1, "{solver_type:?}");
            assert_eq!(result.statistics.unscheduled, 1, "{solver_type:?}");
        }
    }

    #[test]
    fn test_equipment_filter_selects_equipped_room() {
        let mut entities = singleton_entities();
        entities.courses[0] = entities.courses[0].clone().with_equipment("Projector");
        entities.classrooms = vec![
            Classroom::new("r1", "Plain", RoomType::Lecture).with_capacity(30),
            Classroom::new("r2", "Equipped", RoomType::Lecture)
                .with_capacity(30)
                .with_equipment("Projector"),
        ];

        let result = generate(&config(SolverType::Hybrid), &entities);
        assert!(result.success);
        assert_eq!(result.schedule.unwrap().entries[0].classroom_id, "r2");
    }

    #[test]
    fn test_capacity_filter_selects_large_room() {
        let mut entities = singleton_entities();
        entities.courses[0].enrolled_count = 60;
        entities.classrooms = vec![
            Classroom::new("r1", "Small", RoomType::Lecture).with_capacity(30),
            Classroom::new("r2", "Large", RoomType::Lecture).with_capacity(80),
        ];

        let result = generate(&config(SolverType::Hybrid), &entities);
        assert!(result.success);
        assert_eq!(result.schedule.unwrap().entries[0].classroom_id, "r2");
    }

    #[test]
    fn test_preference_wins_tie() {
        let mon9 = slot(DayOfWeek::Monday, "09:00", "10:00");
        let tue9 = slot(DayOfWeek::Tuesday, "09:00", "10:00");
        let mut entities = singleton_entities();
        entities.faculty[0] = Faculty::new("f1", "Dr. Ahmed")
            .with_department("CS")
            .with_availability(mon9)
            .with_availability(tue9)
            .with_preferred_time(tue9);

        let result = generate(&config(SolverType::Hybrid), &entities);
        assert!(result.success);
        assert_eq!(
            result.schedule.unwrap().entries[0].time_slot.day,
            DayOfWeek::Tuesday
        );
    }

    #[test]
    fn test_zero_courses_is_empty_success() {
        let mut entities = singleton_entities();
        entities.courses.clear();

        let result = generate(&config(SolverType::Hybrid), &entities);
        assert!(result.success);
        let schedule = result.schedule.unwrap();
        assert!(schedule.is_empty());
        assert_eq!(result.statistics.total_entries, 0);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_empty_course_selection_is_an_error() {
        let entities = singleton_entities();
        let cfg = GenerationConfig {
            selected_courses: Some(["ghost".to_string()].into()),
            ..config(SolverType::Hybrid)
        };

        let result = generate(&cfg, &entities);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("no_courses_selected"));
    }

    #[test]
    fn test_no_faculty_is_an_error() {
        let mut entities = singleton_entities();
        entities.faculty.clear();

        let result = generate(&config(SolverType::Hybrid), &entities);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("no_faculty_selected"));
    }

    #[test]
    fn test_unavailable_faculty_is_empty_domain() {
        let mut entities = singleton_entities();
        entities.faculty[0].availability.clear();

        let result = generate(&config(SolverType::Hybrid), &entities);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("empty_domain:c1"));
    }

    #[test]
    fn test_invalid_input_surfaces_before_solving() {
        let mut entities = singleton_entities();
        entities.classrooms[0].capacity = 0;

        let result = generate(&config(SolverType::Hybrid), &entities);
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("invalid_input:invalid_capacity")
        );
    }

    #[test]
    fn test_zero_budget_is_invalid_config() {
        let entities = singleton_entities();
        let cfg = GenerationConfig {
            max_time_seconds: 0,
            ..GenerationConfig::default()
        };

        let result = generate(&cfg, &entities);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("invalid_input:invalid_config"));
    }

    #[test]
    fn test_batch_selection_filters_courses() {
        let mon9 = slot(DayOfWeek::Monday, "09:00", "10:00");
        let mon10 = slot(DayOfWeek::Monday, "10:00", "11:00");
        let entities = Entities {
            courses: vec![
                Course::new("c1", "CS101")
                    .with_department("CS")
                    .with_batch("batch-a"),
                Course::new("c2", "CS102")
                    .with_department("CS")
                    .with_batch("batch-b"),
            ],
            faculty: vec![Faculty::new("f1", "A")
                .with_department("CS")
                .with_availability(mon9)
                .with_availability(mon10)],
            classrooms: vec![Classroom::new("r1", "LH-1", RoomType::Lecture).with_capacity(30)],
            ..Entities::default()
        };
        let cfg = GenerationConfig {
            selected_batches: Some(["batch-a".to_string()].into()),
            ..config(SolverType::Hybrid)
        };

        let result = generate(&cfg, &entities);
        assert!(result.success);
        let schedule = result.schedule.unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.entries[0].course_id, "c1");
    }

    #[test]
    fn test_projection_commutes_with_prefiltering() {
        let mon9 = slot(DayOfWeek::Monday, "09:00", "10:00");
        let mon10 = slot(DayOfWeek::Monday, "10:00", "11:00");
        let entities = Entities {
            courses: vec![
                Course::new("c1", "CS101").with_department("CS"),
                Course::new("c2", "CS102").with_department("CS"),
            ],
            faculty: vec![
                Faculty::new("f1", "A")
                    .with_department("CS")
                    .with_availability(mon9)
                    .with_availability(mon10),
                Faculty::new("f2", "B")
                    .with_department("CS")
                    .with_availability(mon9),
            ],
            classrooms: vec![Classroom::new("r1", "LH-1", RoomType::Lecture).with_capacity(30)],
            ..Entities::default()
        };

        let cfg = GenerationConfig {
            selected_courses: Some(["c1".to_string()].into()),
            selected_faculty: Some(["f1".to_string()].into()),
            ..config(SolverType::Hybrid)
        };
        let selected = generate(&cfg, &entities);

        let prefiltered = Entities {
            courses: vec![entities.courses[0].clone()],
            faculty: vec![entities.faculty[0].clone()],
            classrooms: entities.classrooms.clone(),
            time_slots: entities.time_slots.clone(),
        };
        let direct = generate(&config(SolverType::Hybrid), &prefiltered);

        assert_eq!(selected.success, direct.success);
        assert_eq!(
            selected.schedule.unwrap().entries,
            direct.schedule.unwrap().entries
        );
    }

    #[test]
    fn test_determinism_excluding_wall_clock() {
        let entities = singleton_entities();
        let cfg = GenerationConfig {
            optimize: true,
            ..config(SolverType::Hybrid)
        };

        let a = generate(&cfg, &entities);
        let b = generate(&cfg, &entities);

        let mut a_json = serde_json::to_value(&a).unwrap();
        let mut b_json = serde_json::to_value(&b).unwrap();
        a_json["statistics"]["generation_time_seconds"] = 0.into();
        b_json["statistics"]["generation_time_seconds"] = 0.into();
        assert_eq!(a_json, b_json);
    }

    #[test]
    fn test_analysis_attached_only_when_requested() {
        let entities = singleton_entities();

        let without = generate(&config(SolverType::Hybrid), &entities);
        assert!(without.analysis.is_none());

        let cfg = GenerationConfig {
            optimize: true,
            ..config(SolverType::Hybrid)
        };
        let with = generate(&cfg, &entities);
        let analysis = with.analysis.unwrap();
        assert_eq!(analysis.total_conflicts, 0);
        assert_eq!(analysis.faculty_load["f1"], 60);
    }

    #[test]
    fn test_stress_hybrid_holds_invariants_under_tight_budget() {
        // Many single-session courses contending for a small grid: the
        // CSP attempt may time out, greedy takes over, and every hard
        // constraint still holds on the returned schedule.
        let mut courses = Vec::new();
        for i in 0..200 {
            courses.push(
                Course::new(format!("c{i:03}"), format!("CS{i:03}"))
                    .with_department("CS")
                    .with_enrolled(25)
                    .with_credits(1 + (i % 4) as u32),
            );
        }
        let mut faculty = Vec::new();
        for i in 0..5 {
            let mut member = Faculty::new(format!("f{i}"), format!("Prof {i}"))
                .with_department("CS")
                .with_max_hours(40);
            for day in DayOfWeek::ALL {
                for hour in [9u16, 10, 11, 14, 15, 16] {
                    member = member
                        .with_availability(TimeSlot::new(day, hour * 60, hour * 60 + 60));
                }
            }
            faculty.push(member);
        }
        let classrooms = vec![
            Classroom::new("r1", "LH-1", RoomType::Lecture).with_capacity(40),
            Classroom::new("r2", "LH-2", RoomType::Lecture).with_capacity(40),
            Classroom::new("r3", "LH-3", RoomType::Lecture).with_capacity(40),
        ];
        let entities = Entities {
            courses,
            faculty,
            classrooms,
            ..Entities::default()
        };

        let cfg = GenerationConfig {
            max_time_seconds: 1,
            ..GenerationConfig::default()
        };
        let result = generate(&cfg, &entities);

        assert!(result.success, "error: {:?}", result.error);
        assert!(matches!(
            result.statistics.solver_used,
            SolverType::Csp | SolverType::Greedy
        ));
        let schedule = result.schedule.unwrap();
        assert!(constraints::violations(&schedule, &entities).is_empty());
        assert!(schedule.summary.total_sessions_scheduled > 0);
    }

    #[test]
    fn test_more_time_never_lowers_hybrid_score() {
        let entities = singleton_entities();

        let quick = generate(
            &GenerationConfig {
                max_time_seconds: 1,
                ..GenerationConfig::default()
            },
            &entities,
        );
        let generous = generate(
            &GenerationConfig {
                max_time_seconds: 20,
                ..GenerationConfig::default()
            },
            &entities,
        );

        assert!(
            generous.statistics.optimization_score >= quick.statistics.optimization_score - 1e-9
        );
    }
}
