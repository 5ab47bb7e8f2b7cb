//! Dungeon operation errors.

use delve_domain::{DomainError, DungeonId};

use crate::infrastructure::ports::{RegistryError, StoreError};

/// Errors that can occur during dungeon operations.
#[derive(Debug, thiserror::Error)]
pub enum DungeonError {
    #[error("Dungeon template not found: {0}")]
    TemplateNotFound(DungeonId),
    #[error("Dungeon is locked: {0}")]
    Locked(DungeonId),
    #[error("A dungeon run is already in progress")]
    AlreadyRunning,
    #[error("A paused run exists; exit it before starting another")]
    RunInProgress,
    #[error("No active dungeon run")]
    NoActiveRun,
    #[error("Run is not paused")]
    NotPaused,
    #[error("Run is not being explored")]
    NotRunning,
    #[error("No active team")]
    NoActiveTeam,
    #[error("None of the run's party members are on the roster")]
    PartyUnavailable,
    #[error("Run has no encounter at the selected position")]
    EncounterMissing,
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),
    #[error("Character registry error: {0}")]
    Registry(#[from] RegistryError),
}
