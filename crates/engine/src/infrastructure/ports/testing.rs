//! Testability ports for injecting time, randomness and pacing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use delve_domain::EncounterKind;

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Inclusive on both ends.
    fn gen_range(&self, min: i32, max: i32) -> i32;
    /// True with the given probability.
    fn gen_chance(&self, probability: f64) -> bool;
    fn gen_uuid(&self) -> Uuid;
}

/// Presentation delay between encounters. Bosses get a longer beat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PacingPort: Send + Sync {
    async fn pause(&self, beat: EncounterKind);
}
