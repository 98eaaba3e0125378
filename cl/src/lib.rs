//! ChoreLedger - routine lifecycle and points ledger for kids' chores
//!
//! Recurring routines (morning, bedtime, ...) are instantiated once per day
//! from a static catalog. Completing chores earns points, points are spent in
//! a small shop, and the whole state persists in a single JSON file.
//!
//! # Architecture
//!
//! ```text
//! Catalog (static templates + shop)
//!     │
//!     ▼
//! LedgerManager ── Clock (injected "now")
//!     │
//!     ▼
//! StateStore ──► state.json  { routineInstances, totalPoints, spentPoints }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use choreledger::{Catalog, LedgerManager, LedgerOptions, StateStore, SystemClock};
//!
//! let store = StateStore::open("state.json")?;
//! let mut ledger = LedgerManager::open(Catalog::default(), store, SystemClock, LedgerOptions::default())?;
//! let routine_id = ledger.get_or_create_today_instance("morning")?.id.clone();
//! let chore_id = ledger.instance(&routine_id).unwrap().chores[0].id.clone();
//! ledger.set_chore_completion(&routine_id, &chore_id, true)?;
//! println!("points: {}", ledger.total_points());
//! ```

pub mod catalog;
pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod manager;
mod store;

pub use catalog::{Catalog, ChoreDefinition, RoutineTemplate, ShopItem};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use domain::{ChoreInstance, RoutineInstance, RoutineStatus};
pub use error::{LedgerError, LedgerResult, RecordKind};
pub use manager::{LedgerManager, LedgerOptions, LoadOutcome, SweepStats};
pub use store::{PersistedState, StateStore};

/// Default retention window for routine instances, in calendar days
pub const DEFAULT_RETENTION_DAYS: i64 = 7;
