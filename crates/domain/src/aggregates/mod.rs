//! Aggregates own their invariants and expose mutations that return outcomes.

mod run;

pub use run::{EncounterSlot, NextEncounter, Run};
