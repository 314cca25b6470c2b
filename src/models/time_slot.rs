//! Time slot model.
//!
//! A time slot is one teaching period in the weekly grid: a weekday plus
//! a start and end time of day. Slots are value types — equality, ordering,
//! and hashing are all by `(day, start, end)`.
//!
//! # Time Model
//! Times of day are minutes since midnight internally and `"HH:MM"`
//! 24-hour strings on the JSON boundary.

use serde::{Deserialize, Serialize};

/// A teaching weekday.
///
/// Ordered Monday first, so sorting slots yields weekly-grid order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl DayOfWeek {
    /// All teaching days in weekly order.
    pub const ALL: [DayOfWeek; 5] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
    ];

    /// Zero-based weekday index (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A weekly time slot: `(day, start, end)` with `start < end`.
///
/// The ordering invariant is checked by input validation
/// ([`crate::validation::validate_entities`]), not by construction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeSlot {
    /// Weekday this slot falls on.
    pub day: DayOfWeek,
    /// Start of the slot (minutes since midnight; `"HH:MM"` on the boundary).
    #[serde(rename = "start_time", with = "hhmm")]
    pub start: u16,
    /// End of the slot (minutes since midnight; `"HH:MM"` on the boundary).
    #[serde(rename = "end_time", with = "hhmm")]
    pub end: u16,
}

impl TimeSlot {
    /// Creates a slot from raw minutes since midnight.
    pub fn new(day: DayOfWeek, start: u16, end: u16) -> Self {
        Self { day, start, end }
    }

    /// Creates a slot from `"HH:MM"` strings.
    ///
    /// Returns `None` if either string is not a valid 24-hour time.
    pub fn from_hhmm(day: DayOfWeek, start: &str, end: &str) -> Option<Self> {
        Some(Self {
            day,
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
        })
    }

    /// Whether `start < end`.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    /// Slot length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end.saturating_sub(self.start))
    }

    /// Whether two slots overlap: same day and strictly intersecting
    /// intervals. Touching endpoints (one ends when the other starts)
    /// do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

/// Parses a `"HH:MM"` 24-hour time into minutes since midnight.
pub fn parse_hhmm(raw: &str) -> Option<u16> {
    let (hours, minutes) = raw.split_once(':')?;
    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

/// Formats minutes since midnight as `"HH:MM"`.
pub fn format_hhmm(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Serde adapter between minutes since midnight and `"HH:MM"` strings.
mod hhmm {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(minute: &u16, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*minute))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid HH:MM time of day: {raw:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: DayOfWeek, start: &str, end: &str) -> TimeSlot {
        TimeSlot::from_hhmm(day, start, end).unwrap()
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:00"), Some(540));
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("23:59"), Some(23 * 60 + 59));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("12:60"), None);
        assert_eq!(parse_hhmm("noon"), None);
        assert_eq!(parse_hhmm("12"), None);
    }

    #[test]
    fn test_format_hhmm_round_trip() {
        for raw in ["00:00", "09:05", "13:30", "23:59"] {
            assert_eq!(format_hhmm(parse_hhmm(raw).unwrap()), raw);
        }
    }

    #[test]
    fn test_duration() {
        let s = slot(DayOfWeek::Monday, "09:00", "10:30");
        assert_eq!(s.duration_minutes(), 90);
        assert!(s.is_well_formed());
    }

    #[test]
    fn test_overlap_same_day() {
        let a = slot(DayOfWeek::Monday, "09:00", "10:00");
        let b = slot(DayOfWeek::Monday, "09:30", "10:30");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_overlap_different_days() {
        let a = slot(DayOfWeek::Monday, "09:00", "10:00");
        let b = slot(DayOfWeek::Tuesday, "09:00", "10:00");
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_touching_endpoints_do_not_overlap() {
        let a = slot(DayOfWeek::Monday, "09:00", "10:00");
        let b = slot(DayOfWeek::Monday, "10:00", "11:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = slot(DayOfWeek::Friday, "09:00", "12:00");
        let inner = slot(DayOfWeek::Friday, "10:00", "11:00");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_weekly_grid_ordering() {
        let mut slots = vec![
            slot(DayOfWeek::Tuesday, "09:00", "10:00"),
            slot(DayOfWeek::Monday, "11:00", "12:00"),
            slot(DayOfWeek::Monday, "09:00", "10:00"),
        ];
        slots.sort();
        assert_eq!(slots[0].day, DayOfWeek::Monday);
        assert_eq!(slots[0].start, 540);
        assert_eq!(slots[1].day, DayOfWeek::Monday);
        assert_eq!(slots[1].start, 660);
        assert_eq!(slots[2].day, DayOfWeek::Tuesday);
    }

    #[test]
    fn test_json_boundary_shape() {
        let s = slot(DayOfWeek::Wednesday, "14:00", "15:30");
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "day": "Wednesday",
                "start_time": "14:00",
                "end_time": "15:30",
            })
        );
        let back: TimeSlot = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_json_rejects_bad_time() {
        let err = serde_json::from_value::<TimeSlot>(serde_json::json!({
            "day": "Monday",
            "start_time": "25:00",
            "end_time": "26:00",
        }));
        assert!(err.is_err());
    }
}
