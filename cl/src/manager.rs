//! Routine instance lifecycle and points ledger
//!
//! LedgerManager owns every RoutineInstance, enforces one instance per
//! template per local day, derives the points total and persists the whole
//! state after each mutation. A failed write rolls the in-memory change back,
//! so memory never runs ahead of disk.

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::clock::{Clock, SystemClock, days_between};
use crate::domain::{RoutineInstance, RoutineStatus};
use crate::error::{LedgerError, LedgerResult};
use crate::store::{PersistedState, StateStore};

/// Tunables for the ledger
#[derive(Debug, Clone)]
pub struct LedgerOptions {
    /// Instances started more than this many calendar days ago are purged on load
    pub retention_days: i64,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            retention_days: crate::DEFAULT_RETENTION_DAYS,
        }
    }
}

/// How the persisted state was restored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No state file (or a blank one); started empty
    Fresh,
    /// State parsed and restored
    Restored,
    /// State failed to parse; moved aside and started empty
    Reset,
}

/// Result of an expiry sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Ongoing instances from a previous day marked expired
    pub expired: usize,
    /// Instances past the retention window removed
    pub purged: usize,
}

/// Owner of the routine instance collection and the points ledger
pub struct LedgerManager<C: Clock = SystemClock> {
    catalog: Catalog,
    store: StateStore,
    clock: C,
    options: LedgerOptions,
    instances: Vec<RoutineInstance>,
    spent_points: u64,
    total_points: i64,
    load_outcome: LoadOutcome,
}

impl<C: Clock> LedgerManager<C> {
    /// Restore state from `store` and run the expiry sweep
    ///
    /// A corrupt state file never fails startup: it is moved aside, logged,
    /// and the ledger starts empty.
    pub fn open(catalog: Catalog, store: StateStore, clock: C, options: LedgerOptions) -> LedgerResult<Self> {
        debug!(path = ?store.path(), ?options, "LedgerManager::open: called");

        let (state, load_outcome) = match store.load() {
            Ok(Some(state)) => (state, LoadOutcome::Restored),
            Ok(None) => (PersistedState::default(), LoadOutcome::Fresh),
            Err(LedgerError::PersistenceCorrupt(reason)) => {
                warn!(%reason, "Persisted state is corrupt, resetting to empty state");
                if let Err(e) = store.quarantine() {
                    warn!(error = %e, "Failed to move corrupt state file aside");
                }
                (PersistedState::default(), LoadOutcome::Reset)
            }
            Err(e) => return Err(e),
        };

        let mut manager = Self {
            catalog,
            store,
            clock,
            options,
            instances: state.routine_instances,
            spent_points: 0,
            total_points: 0,
            load_outcome,
        };

        let earned = manager.compute_points_total();
        manager.spent_points = match state.spent_points {
            Some(spent) => spent,
            // Records without a debit counter: whatever the stored total is short of earned was spent
            None => earned.saturating_sub(state.total_points.max(0) as u64),
        };
        manager.total_points = manager.ledger_total(earned);

        info!(
            instances = manager.instances.len(),
            total_points = manager.total_points,
            outcome = ?manager.load_outcome,
            "Ledger loaded"
        );

        manager.sweep_expired()?;
        Ok(manager)
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// All held instances, in creation order
    pub fn instances(&self) -> &[RoutineInstance] {
        &self.instances
    }

    pub fn instance(&self, routine_id: &str) -> Option<&RoutineInstance> {
        self.instances.iter().find(|r| r.id == routine_id)
    }

    /// Current ledger balance: earned points minus purchase debits
    pub fn total_points(&self) -> i64 {
        self.total_points
    }

    /// Aggregate of all purchase debits
    pub fn spent_points(&self) -> u64 {
        self.spent_points
    }

    /// Sum of points over every completed chore in every held instance, any status
    pub fn compute_points_total(&self) -> u64 {
        self.instances.iter().map(RoutineInstance::earned_points).sum()
    }

    /// Today's instance for a template, without creating one
    pub fn today_instance(&self, template_id: &str) -> Option<&RoutineInstance> {
        let today = self.clock.today();
        self.instances
            .iter()
            .find(|r| r.routine_id == template_id && r.started_on() == today)
    }

    /// Instances still worth showing: ongoing ones, and ones completed today
    pub fn active_routines(&self) -> Vec<&RoutineInstance> {
        let today = self.clock.today();
        self.instances
            .iter()
            .filter(|r| match r.status {
                RoutineStatus::Ongoing => true,
                RoutineStatus::Completed => r.completed_at.is_some_and(|at| at.date_naive() == today),
                RoutineStatus::Expired => false,
            })
            .collect()
    }

    /// Return today's instance of `template_id`, creating and persisting it if absent
    pub fn get_or_create_today_instance(&mut self, template_id: &str) -> LedgerResult<&RoutineInstance> {
        debug!(%template_id, "LedgerManager::get_or_create_today_instance: called");
        let template = self
            .catalog
            .template(template_id)
            .ok_or_else(|| LedgerError::UnknownTemplate(template_id.to_string()))?;

        let today = self.clock.today();
        if let Some(idx) = self
            .instances
            .iter()
            .position(|r| r.routine_id == template_id && r.started_on() == today)
        {
            debug!(routine_id = %self.instances[idx].id, "Reusing today's instance");
            return Ok(&self.instances[idx]);
        }

        let instance = RoutineInstance::from_template(template, self.clock.now());
        info!(routine_id = %instance.id, %template_id, chores = instance.chores.len(), "Started routine");
        self.instances.push(instance);

        if let Err(e) = self.persist() {
            self.instances.pop();
            return Err(e);
        }

        let idx = self.instances.len() - 1;
        Ok(&self.instances[idx])
    }

    /// Set a chore's completion flag, then recompute routine status and the ledger
    pub fn set_chore_completion(
        &mut self,
        routine_id: &str,
        chore_id: &str,
        completed: bool,
    ) -> LedgerResult<&RoutineInstance> {
        debug!(%routine_id, %chore_id, completed, "LedgerManager::set_chore_completion: called");
        let idx = self
            .instances
            .iter()
            .position(|r| r.id == routine_id)
            .ok_or_else(|| LedgerError::routine_not_found(routine_id))?;

        let now = self.clock.now();
        let snapshot = self.instances[idx].clone();
        let routine = &mut self.instances[idx];
        let chore = routine
            .chore_mut(chore_id)
            .ok_or_else(|| LedgerError::chore_not_found(chore_id))?;

        if chore.set_completed(completed, now) {
            debug!(%chore_id, completed, "Chore toggled");
        }
        if routine.mark_completed_if_done(now) {
            info!(%routine_id, "Routine completed");
        }

        let previous_total = self.total_points;
        self.recompute_total();

        if let Err(e) = self.persist() {
            self.instances[idx] = snapshot;
            self.total_points = previous_total;
            return Err(e);
        }

        Ok(&self.instances[idx])
    }

    /// Debit `cost` points for `item_id`
    ///
    /// Fails with `InsufficientPoints` and leaves the ledger untouched when the
    /// balance is short. Returns the new balance.
    pub fn purchase(&mut self, item_id: &str, cost: u32) -> LedgerResult<i64> {
        debug!(%item_id, cost, "LedgerManager::purchase: called");
        if i64::from(cost) > self.total_points {
            debug!(available = self.total_points, "Purchase refused");
            return Err(LedgerError::InsufficientPoints {
                cost,
                available: self.total_points,
            });
        }

        let previous = (self.spent_points, self.total_points);
        self.spent_points += u64::from(cost);
        self.total_points -= i64::from(cost);

        if let Err(e) = self.persist() {
            (self.spent_points, self.total_points) = previous;
            return Err(e);
        }

        info!(%item_id, cost, total_points = self.total_points, "Purchase recorded");
        Ok(self.total_points)
    }

    /// Buy a catalog shop item at its listed price
    pub fn purchase_item(&mut self, item_id: &str) -> LedgerResult<i64> {
        let cost = self
            .catalog
            .shop_item(item_id)
            .map(|item| item.points)
            .ok_or_else(|| LedgerError::UnknownShopItem(item_id.to_string()))?;
        self.purchase(item_id, cost)
    }

    /// Expire stale ongoing instances and purge ones past the retention window
    ///
    /// Persists once after the pass, whatever it changed.
    pub fn sweep_expired(&mut self) -> LedgerResult<SweepStats> {
        debug!("LedgerManager::sweep_expired: called");
        let now = self.clock.now();
        let today = self.clock.today();
        let retention = self.options.retention_days;

        let snapshot = self.instances.clone();
        let previous_total = self.total_points;
        let mut stats = SweepStats::default();

        self.instances.retain_mut(|routine| {
            let age = days_between(routine.started_on(), today);
            if age > retention {
                debug!(routine_id = %routine.id, age, "Purging routine");
                stats.purged += 1;
                return false;
            }
            if age > 0 && routine.expire(now) {
                debug!(routine_id = %routine.id, age, "Expiring routine");
                stats.expired += 1;
            }
            true
        });

        self.recompute_total();

        if let Err(e) = self.persist() {
            self.instances = snapshot;
            self.total_points = previous_total;
            return Err(e);
        }

        if stats != SweepStats::default() {
            info!(expired = stats.expired, purged = stats.purged, "Sweep complete");
        }
        Ok(stats)
    }

    fn ledger_total(&self, earned: u64) -> i64 {
        earned as i64 - self.spent_points as i64
    }

    fn recompute_total(&mut self) {
        self.total_points = self.ledger_total(self.compute_points_total());
    }

    fn persist(&self) -> LedgerResult<()> {
        self.store.save(&PersistedState {
            routine_instances: self.instances.clone(),
            total_points: self.total_points,
            spent_points: Some(self.spent_points),
        })
    }
}
