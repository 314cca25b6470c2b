//! Classroom model.
//!
//! A classroom hosts course sessions subject to its seating capacity,
//! room type, and installed equipment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Room type classification.
///
/// Compatibility with course types is fixed by
/// [`crate::models::CourseType::admits_room`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Lecture,
    Lab,
    Tutorial,
    Seminar,
    Auditorium,
}

/// A room that can host course sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: String,
    /// Human-readable name (e.g. "LH-201").
    pub name: String,
    /// Room type classification.
    #[serde(rename = "type")]
    pub room_type: RoomType,
    /// Seating capacity (≥ 1).
    pub capacity: u32,
    /// Installed equipment.
    #[serde(default)]
    pub equipment: BTreeSet<String>,
    /// Building or wing label.
    #[serde(default)]
    pub location: String,
}

impl Classroom {
    /// Creates a classroom.
    pub fn new(id: impl Into<String>, name: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            room_type,
            capacity: 1,
            equipment: BTreeSet::new(),
            location: String::new(),
        }
    }

    /// Sets the seating capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Adds an equipment item.
    pub fn with_equipment(mut self, item: impl Into<String>) -> Self {
        self.equipment.insert(item.into());
        self
    }

    /// Sets the location label.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Whether the room seats the given enrollment.
    #[inline]
    pub fn can_accommodate(&self, enrolled_count: u32) -> bool {
        enrolled_count <= self.capacity
    }

    /// Whether the room provides every required equipment item.
    pub fn has_equipment(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.equipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classroom_builder() {
        let room = Classroom::new("r1", "LH-201", RoomType::Lecture)
            .with_capacity(80)
            .with_equipment("Projector")
            .with_equipment("Whiteboard")
            .with_location("Main Block");

        assert_eq!(room.id, "r1");
        assert_eq!(room.capacity, 80);
        assert_eq!(room.equipment.len(), 2);
        assert_eq!(room.location, "Main Block");
    }

    #[test]
    fn test_can_accommodate() {
        let room = Classroom::new("r1", "LH-201", RoomType::Lecture).with_capacity(30);
        assert!(room.can_accommodate(30));
        assert!(room.can_accommodate(0));
        assert!(!room.can_accommodate(31));
    }

    #[test]
    fn test_has_equipment() {
        let room = Classroom::new("r1", "Lab-1", RoomType::Lab)
            .with_equipment("Projector")
            .with_equipment("Workstations");

        let none: BTreeSet<String> = BTreeSet::new();
        let subset: BTreeSet<String> = ["Projector".to_string()].into();
        let missing: BTreeSet<String> = ["Oscilloscope".to_string()].into();

        assert!(room.has_equipment(&none));
        assert!(room.has_equipment(&subset));
        assert!(!room.has_equipment(&missing));
    }

    #[test]
    fn test_room_type_json_field_name() {
        let room = Classroom::new("r1", "Aud-1", RoomType::Auditorium).with_capacity(300);
        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["type"], "Auditorium");

        let back: Classroom = serde_json::from_value(json).unwrap();
        assert_eq!(back.room_type, RoomType::Auditorium);
    }
}
