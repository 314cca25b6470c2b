//! Schedule quality scoring.
//!
//! Computes the weighted optimization score in [0, 100]:
//!
//! | Term | Weight | Definition |
//! |------|--------|-----------|
//! | Conflict-free | 40 | `1 − conflicts/entries` |
//! | Preference hits | 20 | Fraction of entries honoring faculty/day preferences |
//! | Scheduled | 20 | `1 − unscheduled/requirements` |
//! | Capacity fit | 10 | Mean `enrolled/capacity` |
//! | Load balance | 10 | `1 − (max − min)/max` over faculty minute loads |
//!
//! Each term is clamped to [0, 1]. An empty schedule for an empty
//! problem scores 100; an empty schedule for a non-empty problem earns
//! nothing on the preference and capacity terms, so any schedule that
//! places a session outranks one that places none. An entry is a
//! preference hit when it honors every preference the faculty member
//! and course actually declare; undeclared preferences are vacuously
//! honored.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{Entities, Schedule, ScheduleEntry};

/// Computes the optimization score for a set of scheduled entries.
///
/// `conflicts` is the pairwise conflict count among `entries` (zero for
/// anything a solver produced), `total_requirements` the number of
/// session requirements the schedule was solved for.
pub fn optimization_score(
    entries: &[ScheduleEntry],
    conflicts: usize,
    unscheduled: usize,
    total_requirements: usize,
    entities: &Entities,
) -> f64 {
    // Entry-ratio terms are earned: an empty schedule only collects
    // them when the problem itself was empty.
    let vacuous = if total_requirements == 0 { 1.0 } else { 0.0 };

    let conflict_term = if entries.is_empty() {
        1.0
    } else {
        1.0 - conflicts as f64 / entries.len() as f64
    };

    let preference_term = if entries.is_empty() {
        vacuous
    } else {
        let hits = entries
            .iter()
            .filter(|e| preference_hit(e, entities))
            .count();
        hits as f64 / entries.len() as f64
    };

    let scheduled_term = if total_requirements == 0 {
        1.0
    } else {
        1.0 - unscheduled as f64 / total_requirements as f64
    };

    let capacity_term = if entries.is_empty() {
        vacuous
    } else {
        let sum: f64 = entries.iter().map(|e| capacity_fit(e, entities)).sum();
        sum / entries.len() as f64
    };

    let balance_term = load_balance(entries);

    40.0 * clamp_unit(conflict_term)
        + 20.0 * clamp_unit(preference_term)
        + 20.0 * clamp_unit(scheduled_term)
        + 10.0 * clamp_unit(capacity_term)
        + 10.0 * clamp_unit(balance_term)
}

/// Orders two schedules by quality: higher score, then fewer conflicts,
/// then the earlier lexicographic assignment fingerprint.
///
/// `Ordering::Greater` means `a` is the better schedule.
pub fn compare(a: &Schedule, b: &Schedule) -> Ordering {
    a.summary
        .optimization_score
        .total_cmp(&b.summary.optimization_score)
        .then_with(|| b.summary.conflicts.cmp(&a.summary.conflicts))
        .then_with(|| fingerprint(&b.entries).cmp(&fingerprint(&a.entries)))
}

/// Canonical sorted representation of an assignment, used for
/// deterministic tie-breaking between equally scored schedules.
pub fn fingerprint(entries: &[ScheduleEntry]) -> Vec<(String, u32, usize, u16, String, String)> {
    let mut keys: Vec<_> = entries
        .iter()
        .map(|e| {
            (
                e.course_id.clone(),
                e.session_index(),
                e.time_slot.day.index(),
                e.time_slot.start,
                e.faculty_id.clone(),
                e.classroom_id.clone(),
            )
        })
        .collect();
    keys.sort();
    keys
}

fn preference_hit(entry: &ScheduleEntry, entities: &Entities) -> bool {
    let faculty_ok = entities
        .faculty_member(&entry.faculty_id)
        .is_some_and(|f| f.time_preference_satisfied(&entry.time_slot));
    let course_ok = entities
        .course(&entry.course_id)
        .is_some_and(|c| c.day_preference_satisfied(entry.time_slot.day));
    faculty_ok && course_ok
}

fn capacity_fit(entry: &ScheduleEntry, entities: &Entities) -> f64 {
    let (Some(course), Some(room)) = (
        entities.course(&entry.course_id),
        entities.classroom(&entry.classroom_id),
    ) else {
        return 0.0;
    };
    if room.capacity == 0 {
        return 0.0;
    }
    clamp_unit(f64::from(course.enrolled_count) / f64::from(room.capacity))
}

fn load_balance(entries: &[ScheduleEntry]) -> f64 {
    let mut loads: BTreeMap<&str, u32> = BTreeMap::new();
    for entry in entries {
        *loads.entry(entry.faculty_id.as_str()).or_insert(0) +=
            entry.time_slot.duration_minutes();
    }
    if loads.len() <= 1 {
        return 1.0;
    }
    let max = f64::from(*loads.values().max().expect("non-empty"));
    let min = f64::from(*loads.values().min().expect("non-empty"));
    1.0 - (max - min) / max
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
