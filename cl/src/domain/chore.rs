//! ChoreInstance domain type

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::id::instance_id;
use crate::catalog::ChoreDefinition;

/// One chore's completion record within a routine instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoreInstance {
    /// Unique identifier (definition id + creation timestamp)
    pub id: String,

    /// Source chore definition id
    #[serde(default)]
    pub chore_id: String,

    pub title: String,

    /// Estimated time to complete in minutes
    #[serde(default)]
    pub estimated_time: u32,

    #[serde(default, alias = "imageUrl")]
    pub image_ref: String,

    #[serde(default)]
    pub points: u32,

    #[serde(default)]
    pub completed: bool,

    /// Set exactly when `completed` goes false -> true, cleared on true -> false
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
}

impl ChoreInstance {
    /// Create an incomplete instance from a catalog definition
    pub fn from_definition(def: &ChoreDefinition, created_at: DateTime<Local>) -> Self {
        Self {
            id: instance_id(&def.id, &created_at),
            chore_id: def.id.clone(),
            title: def.title.clone(),
            estimated_time: def.estimated_time,
            image_ref: def.image_ref.clone(),
            points: def.points,
            completed: false,
            completed_at: None,
        }
    }

    /// Apply a completion toggle
    ///
    /// Returns true if the completed flag actually changed. Setting the same
    /// value leaves `completed_at` untouched.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Local>) -> bool {
        if self.completed == completed {
            return false;
        }
        self.completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
        true
    }

    /// Points this chore currently contributes to the ledger
    pub fn earned_points(&self) -> u32 {
        if self.completed { self.points } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn def() -> ChoreDefinition {
        ChoreDefinition {
            id: "get-dressed".to_string(),
            title: "Tag tøj på".to_string(),
            estimated_time: 10,
            image_ref: "img/get-dressed.png".to_string(),
            points: 10,
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, h, m, 0).single().unwrap()
    }

    #[test]
    fn test_from_definition_denormalizes() {
        let chore = ChoreInstance::from_definition(&def(), at(7, 0));
        assert!(chore.id.starts_with("get-dressed-"));
        assert_eq!(chore.chore_id, "get-dressed");
        assert_eq!(chore.title, "Tag tøj på");
        assert_eq!(chore.estimated_time, 10);
        assert_eq!(chore.points, 10);
        assert!(!chore.completed);
        assert!(chore.completed_at.is_none());
        assert_eq!(chore.earned_points(), 0);
    }

    #[test]
    fn test_toggle_sets_and_clears_completed_at() {
        let mut chore = ChoreInstance::from_definition(&def(), at(7, 0));

        assert!(chore.set_completed(true, at(7, 5)));
        assert_eq!(chore.completed_at, Some(at(7, 5)));
        assert_eq!(chore.earned_points(), 10);

        // Same value is a no-op on completed_at
        assert!(!chore.set_completed(true, at(7, 30)));
        assert_eq!(chore.completed_at, Some(at(7, 5)));

        assert!(chore.set_completed(false, at(7, 40)));
        assert!(!chore.completed);
        assert!(chore.completed_at.is_none());
        assert_eq!(chore.earned_points(), 0);
    }

    #[test]
    fn test_deserialize_original_record_shape() {
        let json = r#"{
            "id": "get-dressed-1",
            "choreId": "get-dressed",
            "title": "Tag tøj på",
            "estimatedTime": 10,
            "imageUrl": "img/get-dressed.png",
            "points": 10,
            "completed": true,
            "completedAt": "2026-10-19T07:05:00+02:00"
        }"#;
        let chore: ChoreInstance = serde_json::from_str(json).unwrap();
        assert_eq!(chore.image_ref, "img/get-dressed.png");
        assert!(chore.completed);
        assert!(chore.completed_at.is_some());
    }
}
