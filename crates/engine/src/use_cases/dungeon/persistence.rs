//! Persistence bridge for in-flight runs and the last failure record.

use std::sync::Arc;

use delve_domain::{Run, RunRecord};

use crate::infrastructure::ports::{PersistenceStore, StoreError};

use super::error::DungeonError;
use super::snapshots::PartySnapshots;

pub const CURRENT_RUN_KEY: &str = "current_dungeon";
pub const LAST_RECORD_KEY: &str = "last_dungeon_record";

/// Startup reconciliation outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Recovery {
    /// Nothing was persisted.
    Clean,
    /// A consistent run was found and can be driven again.
    Resumable(Run),
    /// Persisted state was inconsistent and has been cleared.
    Discarded(DiscardReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// A run was saved but its party no longer holds stat snapshots.
    MissingSnapshots,
    /// Snapshots exist without a saved run.
    OrphanedSnapshots,
    /// The saved run could not be read or broke its invariants.
    Corrupted,
}

pub struct RunPersistence {
    store: Arc<dyn PersistenceStore>,
}

impl RunPersistence {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    pub fn save_run(&self, run: &Run) -> Result<(), StoreError> {
        self.store.save(CURRENT_RUN_KEY, &serde_json::to_value(run)?)
    }

    /// Loads the saved run. Unreadable or invalid data is reported as
    /// `Ok(None)` after being logged; only store failures are errors.
    pub fn load_run(&self) -> Result<Option<Run>, StoreError> {
        Ok(match self.load_checked()? {
            Loaded::Run(run) => Some(run),
            Loaded::Nothing | Loaded::Corrupted => None,
        })
    }

    pub fn clear_run(&self) -> Result<(), StoreError> {
        self.store.remove(CURRENT_RUN_KEY)
    }

    pub fn save_record(&self, record: &RunRecord) -> Result<(), StoreError> {
        self.store
            .save(LAST_RECORD_KEY, &serde_json::to_value(record)?)
    }

    pub fn load_record(&self) -> Result<Option<RunRecord>, StoreError> {
        let Some(value) = self.store.load(LAST_RECORD_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable run record");
                Ok(None)
            }
        }
    }

    pub fn clear_record(&self) -> Result<(), StoreError> {
        self.store.remove(LAST_RECORD_KEY)
    }

    /// Reconciles the saved run with the characters' snapshots.
    ///
    /// A run is resumable only if every party member still holds a
    /// snapshot. Any other combination clears both sides.
    pub fn reconcile(&self, snapshots: &PartySnapshots) -> Result<Recovery, DungeonError> {
        let loaded = self.load_checked()?;
        let holders = snapshots.holders()?;

        let recovery = match loaded {
            Loaded::Run(run) => {
                let complete = run.party().iter().all(|id| holders.contains(id));
                if complete {
                    tracing::info!(
                        dungeon_id = %run.dungeon_id(),
                        progress = run.progress().value(),
                        "Saved run is resumable"
                    );
                    return Ok(Recovery::Resumable(run));
                }
                Recovery::Discarded(DiscardReason::MissingSnapshots)
            }
            Loaded::Corrupted => Recovery::Discarded(DiscardReason::Corrupted),
            Loaded::Nothing if holders.is_empty() => return Ok(Recovery::Clean),
            Loaded::Nothing => Recovery::Discarded(DiscardReason::OrphanedSnapshots),
        };

        tracing::warn!(reason = ?recovery, "Discarding inconsistent dungeon state");
        self.clear_run()?;
        snapshots.restore(&holders);
        Ok(recovery)
    }

    fn load_checked(&self) -> Result<Loaded, StoreError> {
        let Some(value) = self.store.load(CURRENT_RUN_KEY)? else {
            return Ok(Loaded::Nothing);
        };
        // A blank dungeon id means "no run" rather than corruption.
        let blank_id = value
            .get("dungeonId")
            .map(|id| id.is_null() || id.as_str().is_some_and(|s| s.trim().is_empty()))
            .unwrap_or(true);
        if blank_id {
            return Ok(Loaded::Nothing);
        }

        let mut run: Run = match serde_json::from_value(value) {
            Ok(run) => run,
            Err(e) => {
                tracing::warn!(error = %e, "Saved run is unreadable");
                return Ok(Loaded::Corrupted);
            }
        };
        if let Err(e) = run.validate() {
            tracing::warn!(error = %e, "Saved run breaks run invariants");
            return Ok(Loaded::Corrupted);
        }
        if run.align_counters() {
            tracing::debug!(
                dungeon_id = %run.dungeon_id(),
                "Realigned defeated monster count with monster index"
            );
        }
        let stored = run.progress();
        if run.recompute_progress() != stored {
            tracing::debug!(
                dungeon_id = %run.dungeon_id(),
                stored = stored.value(),
                progress = run.progress().value(),
                "Recomputed progress from defeated encounters"
            );
        }
        Ok(Loaded::Run(run))
    }
}

enum Loaded {
    Nothing,
    Corrupted,
    Run(Run),
}
