//! RoutineInstance domain type
//!
//! One dated occurrence of a routine template. Chore membership is fixed at
//! creation; only completion flags and the status change afterwards.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::chore::ChoreInstance;
use super::id::instance_id;
use crate::catalog::RoutineTemplate;
use crate::clock::local_day;

/// Routine instance status
///
/// `Ongoing` is the only non-terminal state; `Completed` and `Expired` are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoutineStatus {
    /// Started and still actionable
    #[default]
    Ongoing,
    /// Every chore completed
    Completed,
    /// Day boundary passed before completion
    Expired,
}

impl std::fmt::Display for RoutineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Completed => write!(f, "completed"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// A dated routine with independently trackable chores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineInstance {
    /// Unique identifier (template id + creation timestamp)
    pub id: String,

    /// Source template id
    pub routine_id: String,

    pub title: String,

    #[serde(default, alias = "imageUrl")]
    pub image_ref: String,

    /// Creation time, never changed afterwards
    pub started_at: DateTime<Local>,

    /// Set when the routine completes or expires
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,

    #[serde(default)]
    pub chores: Vec<ChoreInstance>,

    #[serde(default)]
    pub status: RoutineStatus,
}

impl RoutineInstance {
    /// Create an ongoing instance with one chore per template definition, in order
    pub fn from_template(template: &RoutineTemplate, now: DateTime<Local>) -> Self {
        Self {
            id: instance_id(&template.id, &now),
            routine_id: template.id.clone(),
            title: template.title.clone(),
            image_ref: template.image_ref.clone(),
            started_at: now,
            completed_at: None,
            chores: template
                .chores
                .iter()
                .map(|def| ChoreInstance::from_definition(def, now))
                .collect(),
            status: RoutineStatus::Ongoing,
        }
    }

    /// Local calendar day the routine was started on
    pub fn started_on(&self) -> NaiveDate {
        local_day(&self.started_at)
    }

    pub fn chore(&self, chore_id: &str) -> Option<&ChoreInstance> {
        self.chores.iter().find(|c| c.id == chore_id)
    }

    pub fn chore_mut(&mut self, chore_id: &str) -> Option<&mut ChoreInstance> {
        self.chores.iter_mut().find(|c| c.id == chore_id)
    }

    /// True when every chore is complete (vacuously true for an empty routine)
    pub fn all_completed(&self) -> bool {
        self.chores.iter().all(|c| c.completed)
    }

    /// (completed, total) chore counts
    pub fn progress(&self) -> (usize, usize) {
        let done = self.chores.iter().filter(|c| c.completed).count();
        (done, self.chores.len())
    }

    /// Points earned by this routine's completed chores
    pub fn earned_points(&self) -> u64 {
        self.chores.iter().map(|c| u64::from(c.earned_points())).sum()
    }

    /// Completed and expired routines never change status again
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, RoutineStatus::Completed | RoutineStatus::Expired)
    }

    /// Transition Ongoing -> Completed if every chore is done
    /// Returns true if the transition was made
    pub fn mark_completed_if_done(&mut self, now: DateTime<Local>) -> bool {
        if !self.is_terminal() && self.all_completed() {
            self.status = RoutineStatus::Completed;
            self.completed_at = Some(now);
            true
        } else {
            false
        }
    }

    /// Transition Ongoing -> Expired
    /// Returns true if the transition was made, false if already terminal
    pub fn expire(&mut self, now: DateTime<Local>) -> bool {
        if !self.is_terminal() {
            self.status = RoutineStatus::Expired;
            self.completed_at = Some(now);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ChoreDefinition;
    use chrono::TimeZone;

    fn template() -> RoutineTemplate {
        RoutineTemplate {
            id: "morning".to_string(),
            title: "Morning".to_string(),
            image_ref: "img/morning.png".to_string(),
            chores: vec![
                ChoreDefinition {
                    id: "a".to_string(),
                    title: "A".to_string(),
                    estimated_time: 5,
                    image_ref: String::new(),
                    points: 5,
                },
                ChoreDefinition {
                    id: "b".to_string(),
                    title: "B".to_string(),
                    estimated_time: 10,
                    image_ref: String::new(),
                    points: 10,
                },
            ],
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, h, m, 0).single().unwrap()
    }

    #[test]
    fn test_from_template_preserves_order() {
        let routine = RoutineInstance::from_template(&template(), at(7, 0));
        assert_eq!(routine.routine_id, "morning");
        assert_eq!(routine.status, RoutineStatus::Ongoing);
        assert_eq!(routine.started_at, at(7, 0));
        assert!(routine.completed_at.is_none());
        let ids: Vec<_> = routine.chores.iter().map(|c| c.chore_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(routine.progress(), (0, 2));
    }

    #[test]
    fn test_mark_completed_if_done() {
        let mut routine = RoutineInstance::from_template(&template(), at(7, 0));
        let a = routine.chores[0].id.clone();
        let b = routine.chores[1].id.clone();

        routine.chore_mut(&a).unwrap().set_completed(true, at(7, 5));
        assert!(!routine.mark_completed_if_done(at(7, 5)));
        assert_eq!(routine.earned_points(), 5);

        routine.chore_mut(&b).unwrap().set_completed(true, at(7, 10));
        assert!(routine.mark_completed_if_done(at(7, 10)));
        assert_eq!(routine.status, RoutineStatus::Completed);
        assert_eq!(routine.completed_at, Some(at(7, 10)));
        assert_eq!(routine.earned_points(), 15);

        // Completed is sticky even after un-completing a chore
        routine.chore_mut(&b).unwrap().set_completed(false, at(7, 20));
        assert!(!routine.mark_completed_if_done(at(7, 20)));
        assert_eq!(routine.status, RoutineStatus::Completed);
        assert_eq!(routine.completed_at, Some(at(7, 10)));

        assert!(routine.is_terminal());
        assert!(!routine.expire(at(23, 0)));
        assert_eq!(routine.status, RoutineStatus::Completed);
    }

    #[test]
    fn test_expire_only_from_ongoing() {
        let mut routine = RoutineInstance::from_template(&template(), at(7, 0));
        assert!(routine.expire(at(23, 0)));
        assert_eq!(routine.status, RoutineStatus::Expired);
        assert!(routine.is_terminal());

        assert!(!routine.expire(at(23, 30)));
        assert_eq!(routine.completed_at, Some(at(23, 0)));

        for c in routine.chores.iter_mut() {
            c.set_completed(true, at(23, 40));
        }
        assert!(!routine.mark_completed_if_done(at(23, 40)));
        assert_eq!(routine.status, RoutineStatus::Expired);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RoutineStatus::Ongoing.to_string(), "ongoing");
        assert_eq!(RoutineStatus::Completed.to_string(), "completed");
        assert_eq!(RoutineStatus::Expired.to_string(), "expired");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&RoutineStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
