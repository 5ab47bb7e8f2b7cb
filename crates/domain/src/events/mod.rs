//! Events emitted while a run progresses.
//!
//! `RunEvent` is the presentation stream; `VictoryOutcome` is what a run
//! mutation returns to the orchestrator.

mod run_events;

pub use run_events::{LogTone, RunEvent, VictoryOutcome};
