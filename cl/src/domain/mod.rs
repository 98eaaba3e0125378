//! Domain types for choreledger
//!
//! Core domain types: RoutineInstance, ChoreInstance
//! Instances are dated copies of catalog templates; their fields are
//! denormalized at creation so later catalog edits never rewrite history.

mod chore;
mod id;
mod routine;

pub use chore::ChoreInstance;
pub use id::instance_id;
pub use routine::{RoutineInstance, RoutineStatus};
